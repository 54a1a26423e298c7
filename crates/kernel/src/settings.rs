use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "QWAT_ENV";
const CONFIG_DIR_ENV: &str = "QWAT_CONFIG_DIR";
const ENV_PREFIX: &str = "QWAT";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub payment: PaymentSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay
    /// and `QWAT_*` variables (`__` separates nested keys).
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to repo root `config` directory.
            Err(_) => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from an explicit directory and environment name.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let parsed_environment: Environment = environment.parse()?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected environment wins over anything written in the files.
        settings.environment = parsed_environment;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Browser origins allowed by CORS. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            cors_origins: Vec::new(),
        }
    }
}

/// Where the catalog slot lives.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "StorageSettings::default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "StorageSettings::default_slot")]
    pub slot: String,
}

impl StorageSettings {
    fn default_data_dir() -> PathBuf {
        PathBuf::from("data")
    }

    fn default_slot() -> String {
        "qwat_books".to_string()
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            slot: Self::default_slot(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Directive string in `RUST_LOG` syntax.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Administrative passcode gate. Not a security boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSettings {
    #[serde(default = "AdminSettings::default_passcode")]
    pub passcode: String,
    #[serde(default = "AdminSettings::default_error_clear_ms")]
    pub error_clear_ms: u64,
}

impl AdminSettings {
    fn default_passcode() -> String {
        "122333".to_string()
    }

    fn default_error_clear_ms() -> u64 {
        2000
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            passcode: Self::default_passcode(),
            error_clear_ms: Self::default_error_clear_ms(),
        }
    }
}

/// Static payment-instruction content shown for paid listings.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "PaymentSettings::default_contact_url")]
    pub contact_url: String,
    #[serde(default = "PaymentSettings::default_card_number")]
    pub card_number: String,
    #[serde(default = "PaymentSettings::default_wallet_number")]
    pub wallet_number: String,
}

impl PaymentSettings {
    fn default_contact_url() -> String {
        "https://instagram.com/qwat__4".to_string()
    }

    fn default_card_number() -> String {
        "6042375417".to_string()
    }

    fn default_wallet_number() -> String {
        "07857095906".to_string()
    }
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            contact_url: Self::default_contact_url(),
            card_number: Self::default_card_number(),
            wallet_number: Self::default_wallet_number(),
        }
    }
}
