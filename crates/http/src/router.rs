//! Router assembly: module mounts, docs and the middleware stack.

use std::time::Duration;

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    routing::{get, MethodRouter},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};

use qwat_kernel::{Module, ModuleRegistry};

use crate::openapi;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    pub fn route(mut self, path: &str, route: MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Nest the module's routes under its mount path.
    pub fn mount(mut self, module: &dyn Module) -> Self {
        let path = module.mount_path();
        tracing::info!(module = module.name(), %path, "mounting module routes");
        self.router = self.router.nest(&path, module.routes());
        self
    }

    /// Serve the merged document at `/docs/openapi.json` and Swagger UI at
    /// `/swagger-ui`.
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let document = openapi::merged_document(registry);
        let typed = openapi::typed_document(&document);

        self.router = self
            .router
            .merge(utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", typed))
            .route(
                "/docs/openapi.json",
                get(move || async move { Json(document.clone()) }),
            );
        self
    }

    /// One span per request, tagged with the request id.
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id,
                    )
                })
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Allow the listed origins, or any origin when the list is empty.
    pub fn with_cors(mut self, origins: &[String]) -> Self {
        let allow_origin = if origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(%origin, "ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(parsed)
        };

        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Assign an id to requests lacking one and echo it on the response.
    /// Added after `with_tracing` so spans can read it.
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Answer `408 Request Timeout` when a handler runs past `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.router = self.router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ));
        self
    }

    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
