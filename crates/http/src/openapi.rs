//! One OpenAPI document assembled from every registered module.

use qwat_kernel::ModuleRegistry;
use serde_json::{json, Map, Value};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

const TITLE: &str = "qwat catalog API";
const VERSION: &str = "1.0.0";

/// Merge module fragments, prefixing each path with the module's mount path.
/// Later modules win on schema name clashes.
pub fn merged_document(registry: &ModuleRegistry) -> Value {
    let mut paths = Map::new();
    let mut schemas = Map::new();

    paths.insert("/healthz".to_string(), healthz_path());
    schemas.insert("ErrorResponse".to_string(), error_schema());

    for module in registry.modules() {
        let Some(fragment) = module.openapi() else {
            continue;
        };
        let mount = module.mount_path();

        if let Some(module_paths) = fragment.get("paths").and_then(Value::as_object) {
            for (path, item) in module_paths {
                paths.insert(format!("{mount}{path}"), item.clone());
            }
        }
        if let Some(module_schemas) = fragment
            .pointer("/components/schemas")
            .and_then(Value::as_object)
        {
            schemas.extend(module_schemas.clone());
        }

        tracing::debug!(module = module.name(), %mount, "openapi fragment merged");
    }

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": TITLE,
            "version": VERSION,
            "description": "Catalog of free and paid book references"
        },
        "paths": paths,
        "components": { "schemas": schemas }
    })
}

/// Typed form of `document` for Swagger UI. A document utoipa cannot read
/// degrades to title and version only.
pub fn typed_document(document: &Value) -> OpenApi {
    serde_json::from_value(document.clone()).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "merged OpenAPI document rejected; serving bare info");
        OpenApiBuilder::new()
            .info(InfoBuilder::new().title(TITLE).version(VERSION).build())
            .build()
    })
}

fn healthz_path() -> Value {
    json!({
        "get": {
            "summary": "Process health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": { "text/plain": { "schema": { "type": "string" } } }
                }
            }
        }
    })
}

fn error_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "error": {
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "message": { "type": "string" },
                    "details": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "field": { "type": "string" },
                                "error": { "type": "string" }
                            }
                        }
                    },
                    "trace_id": { "type": "string", "format": "uuid" },
                    "timestamp": { "type": "string", "format": "date-time" }
                },
                "required": ["code", "message", "details", "trace_id", "timestamp"]
            }
        },
        "required": ["error"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Shelf;

    #[async_trait::async_trait]
    impl qwat_kernel::Module for Shelf {
        fn name(&self) -> &'static str {
            "shelf"
        }

        fn openapi(&self) -> Option<Value> {
            Some(json!({
                "paths": { "/items": { "get": { "summary": "List items", "responses": {} } } },
                "components": { "schemas": { "Item": { "type": "object" } } }
            }))
        }
    }

    struct Storefront;

    #[async_trait::async_trait]
    impl qwat_kernel::Module for Storefront {
        fn name(&self) -> &'static str {
            "storefront"
        }

        fn mount_path(&self) -> String {
            "/shop".to_string()
        }

        fn openapi(&self) -> Option<Value> {
            Some(json!({ "paths": { "/cart": { "get": { "responses": {} } } } }))
        }
    }

    #[test]
    fn fragments_land_under_mount_paths() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(Shelf)).unwrap();
        registry.register(Arc::new(Storefront)).unwrap();

        let document = merged_document(&registry);
        assert!(document["paths"]["/api/shelf/items"]["get"].is_object());
        assert!(document["paths"]["/shop/cart"]["get"].is_object());
        assert!(document["paths"]["/healthz"].is_object());
        assert!(document["components"]["schemas"]["Item"].is_object());
        assert!(document["components"]["schemas"]["ErrorResponse"].is_object());
    }

    #[test]
    fn bare_registry_still_documents_health() {
        let document = merged_document(&ModuleRegistry::new());
        let paths = document["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(document["info"]["title"], TITLE);
    }

    #[test]
    fn unreadable_document_falls_back_to_info() {
        let typed = typed_document(&json!({ "openapi": 7 }));
        assert_eq!(typed.info.title, TITLE);
        assert!(typed.paths.paths.is_empty());
    }
}
