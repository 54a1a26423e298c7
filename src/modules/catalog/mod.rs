pub mod activation;
pub mod gate;
pub mod models;
pub mod projection;
pub mod routes;
pub mod seed;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use once_cell::sync::OnceCell;
use qwat_kernel::settings::StorageSettings;
use qwat_kernel::{InitCtx, Module};
use qwat_storage::FileStore;

use routes::{CatalogState, DynStore};
use store::{CatalogError, CatalogStore};

/// Open the configured file-backed slot and load the catalog from it.
pub fn open_store(settings: &StorageSettings) -> Result<CatalogStore<FileStore>, CatalogError> {
    let storage = FileStore::open(&settings.data_dir)?;
    CatalogStore::initialize(storage, settings.slot.clone())
}

/// Catalog module: listings, projection, activation and the admin gate
pub struct CatalogModule {
    state: OnceCell<Arc<CatalogState>>,
}

impl CatalogModule {
    pub const fn new() -> Self {
        Self {
            state: OnceCell::new(),
        }
    }
}

impl Default for CatalogModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if self.state.get().is_some() {
            return Ok(());
        }

        let storage: DynStore = Box::new(FileStore::open(&ctx.settings.storage.data_dir)?);
        let store = CatalogStore::initialize(storage, ctx.settings.storage.slot.clone())?;

        let state = Arc::new(CatalogState::new(store, ctx.settings));
        if self.state.set(state).is_err() {
            anyhow::bail!("catalog module initialized twice");
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            data_dir = %ctx.settings.storage.data_dir.display(),
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        match self.state.get() {
            Some(state) => routes::router(state.clone()),
            None => {
                tracing::warn!(module = self.name(), "routes requested before init");
                Router::new()
            }
        }
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if let Some(state) = self.state.get() {
            let listings = state.listing_count().await;
            tracing::info!(module = self.name(), listings, "catalog module started");
        }
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "catalog module stopped");
        Ok(())
    }
}

/// Create a new instance of the catalog module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(CatalogModule::new())
}

fn error_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema }
        }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let listing_ref = serde_json::json!({ "$ref": "#/components/schemas/Listing" });
    let id_param = serde_json::json!({
        "name": "id", "in": "path", "required": true, "schema": { "type": "string" }
    });
    let token_header = serde_json::json!({
        "name": routes::ADMIN_TOKEN_HEADER, "in": "header", "required": true,
        "schema": { "type": "string", "format": "uuid" }
    });

    serde_json::json!({
        "paths": {
            "/listings": {
                "get": {
                    "summary": "List listings narrowed by category and search text",
                    "tags": ["Catalog"],
                    "parameters": [
                        { "name": "category", "in": "query", "required": false, "schema": { "type": "string" } },
                        { "name": "search", "in": "query", "required": false, "schema": { "type": "string" } }
                    ],
                    "responses": {
                        "200": json_response("Projected listings", serde_json::json!({
                            "type": "array", "items": listing_ref
                        }))
                    }
                },
                "post": {
                    "summary": "Add a listing",
                    "tags": ["Catalog"],
                    "parameters": [token_header],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/NewListing" }
                            }
                        }
                    },
                    "responses": {
                        "201": json_response("Listing added", listing_ref.clone()),
                        "401": error_response("Admin surface locked"),
                        "422": error_response("Title missing")
                    }
                }
            },
            "/listings/{id}": {
                "delete": {
                    "summary": "Remove a listing",
                    "tags": ["Catalog"],
                    "parameters": [id_param, token_header],
                    "responses": {
                        "204": { "description": "Listing removed" },
                        "401": error_response("Admin surface locked"),
                        "404": error_response("Unknown listing")
                    }
                }
            },
            "/listings/{id}/activate": {
                "post": {
                    "summary": "Activate a listing",
                    "tags": ["Catalog"],
                    "parameters": [id_param],
                    "responses": {
                        "200": json_response("Payment instructions, a link to open, or nothing",
                            serde_json::json!({ "type": "object" })),
                        "404": error_response("Unknown listing")
                    }
                }
            },
            "/categories": {
                "get": {
                    "summary": "Category choices, the all-category label first",
                    "tags": ["Catalog"],
                    "responses": {
                        "200": json_response("Category labels", serde_json::json!({
                            "type": "array", "items": { "type": "string" }
                        }))
                    }
                }
            },
            "/payment": {
                "get": {
                    "summary": "Payment instructions for paid listings",
                    "tags": ["Catalog"],
                    "responses": {
                        "200": json_response("Payment instructions", serde_json::json!({ "type": "object" }))
                    }
                }
            },
            "/admin/unlock": {
                "post": {
                    "summary": "Submit the admin passcode",
                    "tags": ["Admin"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": { "code": { "type": "string" } },
                                    "required": ["code"]
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": json_response("Admin token", serde_json::json!({
                            "type": "object",
                            "properties": { "token": { "type": "string", "format": "uuid" } }
                        })),
                        "401": error_response("Passcode mismatch")
                    }
                }
            },
            "/admin/status": {
                "get": {
                    "summary": "Admin gate status",
                    "tags": ["Admin"],
                    "responses": {
                        "200": json_response("Gate status", serde_json::json!({
                            "type": "object",
                            "properties": {
                                "unlocked": { "type": "boolean" },
                                "error_flag": { "type": "boolean" }
                            }
                        }))
                    }
                }
            },
            "/admin/close": {
                "post": {
                    "summary": "Close the admin surface",
                    "tags": ["Admin"],
                    "responses": { "204": { "description": "Closed" } }
                }
            },
            "/health": {
                "get": {
                    "summary": "Catalog health check",
                    "tags": ["Catalog"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Listing": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "price": {
                            "description": "\"free\" or a positive amount",
                            "oneOf": [
                                { "type": "string", "enum": ["free"] },
                                { "type": "number" }
                            ]
                        },
                        "category": { "type": "string" },
                        "coverImage": { "type": "string" },
                        "description": { "type": "string" },
                        "link": { "type": "string" },
                        "isPaymentRequired": { "type": "boolean" }
                    },
                    "required": ["id", "title", "author", "price", "category"]
                },
                "NewListing": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "category": { "type": "string" },
                        "price": {
                            "oneOf": [ { "type": "string" }, { "type": "number" } ]
                        },
                        "link": { "type": "string" },
                        "isPaymentRequired": { "type": "boolean" }
                    },
                    "required": ["title"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qwat_kernel::settings::Settings;

    fn settings_in(dir: &std::path::Path) -> Settings {
        let mut settings = Settings::default();
        settings.storage.data_dir = dir.to_path_buf();
        settings
    }

    #[tokio::test]
    async fn init_loads_seed_and_mounts_routes() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let ctx = InitCtx {
            settings: &settings,
        };

        let module = CatalogModule::new();
        module.init(&ctx).await.unwrap();
        module.start(&ctx).await.unwrap();

        let state = module.state.get().unwrap();
        assert_eq!(state.listing_count().await, 3);
        module.stop().await.unwrap();
    }

    #[tokio::test]
    async fn lifecycle_runs_on_a_spawned_task() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let module = create_module();

        let lifecycle = tokio::spawn(async move {
            let ctx = InitCtx {
                settings: &settings,
            };
            module.init(&ctx).await?;
            module.start(&ctx).await?;
            module.stop().await
        });

        lifecycle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn second_init_keeps_existing_state() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let ctx = InitCtx {
            settings: &settings,
        };

        let module = CatalogModule::new();
        module.init(&ctx).await.unwrap();
        module.init(&ctx).await.unwrap();
    }

    #[test]
    fn open_store_reads_persisted_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = StorageSettings::default();
        settings.data_dir = dir.path().to_path_buf();

        let mut store = open_store(&settings).unwrap();
        store.remove("1").unwrap();

        let reopened = open_store(&settings).unwrap();
        assert_eq!(reopened.listings().len(), 2);
        assert_eq!(reopened.source(), store::InitSource::Persisted);
    }

    #[test]
    fn openapi_fragment_documents_every_route() {
        let fragment = openapi_fragment();
        for path in [
            "/listings",
            "/listings/{id}",
            "/listings/{id}/activate",
            "/categories",
            "/payment",
            "/admin/unlock",
            "/admin/status",
            "/admin/close",
            "/health",
        ] {
            assert!(fragment["paths"][path].is_object(), "missing {path}");
        }
    }
}
