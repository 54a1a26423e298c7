use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// What a module sees while the application boots.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// A feature area that owns routes, an OpenAPI fragment and a lifecycle.
///
/// The registry calls `init` then `start` in registration order and `stop`
/// in reverse. `routes` is read after `init`.
#[async_trait]
pub trait Module: Sync + Send {
    fn name(&self) -> &'static str;

    /// Where the HTTP layer nests this module's router.
    fn mount_path(&self) -> String {
        format!("/api/{}", self.name())
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI `paths` and `components` relative to `mount_path`.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
