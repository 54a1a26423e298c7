use anyhow::Context;
use qwat_kernel::settings::Settings;
use qwat_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load qwat settings")?;
    qwat_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        data_dir = %settings.storage.data_dir.display(),
        slot = %settings.storage.slot,
        "qwat-app bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    qwat_app::modules::register_all(&mut registry)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("qwat-app bootstrap complete");

    let served = qwat_http::start_server(&registry, &settings, shutdown_signal()).await;
    registry.stop_modules().await?;
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
