//! Axum server for qwat: module mounting, error envelope and API docs.

use std::time::Duration;

use anyhow::Context;
use axum::{routing::get, Router};

use qwat_kernel::settings::Settings;
use qwat_kernel::ModuleRegistry;

pub mod error;
pub mod openapi;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server and serve until `shutdown` resolves
pub async fn start_server<F>(
    registry: &ModuleRegistry,
    settings: &Settings,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = build_router(registry, settings);

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!(%address, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Mount `/healthz`, every module and the docs, then wrap them in the
/// middleware stack.
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let builder = registry.modules().fold(
        RouterBuilder::new().route("/healthz", get(|| async { "ok" })),
        |builder, module| builder.mount(module.as_ref()),
    );

    builder
        .with_openapi(registry)
        .with_tracing()
        .with_cors(&settings.server.cors_origins)
        .with_request_id()
        .with_timeout(Duration::from_millis(settings.server.request_timeout_ms))
        .build()
}
