//! HTTP handlers for the catalog module.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use qwat_http::error::AppError;
use qwat_kernel::settings::Settings;
use qwat_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::activation::{activate, Activation, PaymentInstructions};
use super::gate::{AccessGate, GateOutcome};
use super::models::{Listing, NewListing};
use super::projection::{categories, CategoryFilter, MemoizedProjection, ViewState};
use super::store::{CatalogError, CatalogStore};

/// Header carrying the token issued by `POST /admin/unlock`.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

pub type DynStore = Box<dyn KeyValueStore>;

/// Admin surface state: the passcode gate plus the token it issued.
struct AdminSession {
    gate: AccessGate,
    token: Option<Uuid>,
}

/// Shared state behind every catalog route.
pub struct CatalogState {
    store: Mutex<CatalogStore<DynStore>>,
    projection: Mutex<MemoizedProjection>,
    admin: Mutex<AdminSession>,
    payment: PaymentInstructions,
    error_clear_delay: Duration,
}

impl CatalogState {
    pub fn new(store: CatalogStore<DynStore>, settings: &Settings) -> Self {
        Self {
            store: Mutex::new(store),
            projection: Mutex::new(MemoizedProjection::new()),
            admin: Mutex::new(AdminSession {
                gate: AccessGate::new(settings.admin.passcode.clone()),
                token: None,
            }),
            payment: PaymentInstructions::from_settings(&settings.payment),
            error_clear_delay: Duration::from_millis(settings.admin.error_clear_ms),
        }
    }

    pub async fn listing_count(&self) -> usize {
        self.store.lock().await.listings().len()
    }

    /// Fail unless `headers` carry the token of the open admin session.
    async fn require_admin(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let presented = headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok());

        let admin = self.admin.lock().await;
        match (admin.gate.is_granted(), admin.token, presented) {
            (true, Some(expected), Some(presented)) if expected == presented => Ok(()),
            _ => Err(AppError::unauthorized(
                "admin_required",
                "unlock the admin surface first",
            )),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Internal(anyhow::Error::new(err).context("catalog persistence failed"))
    }
}

pub fn router(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/listings", get(list_listings).post(create_listing))
        .route("/listings/{id}", delete(delete_listing))
        .route("/listings/{id}/activate", post(activate_listing))
        .route("/categories", get(list_categories))
        .route("/payment", get(payment_info))
        .route("/admin/unlock", post(unlock))
        .route("/admin/status", get(admin_status))
        .route("/admin/close", post(close_admin))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "catalog module is healthy"
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ListingQuery {
    fn view_state(&self) -> ViewState {
        ViewState::new(
            CategoryFilter::from_label(self.category.as_deref().unwrap_or_default()),
            self.search.clone().unwrap_or_default(),
        )
    }
}

async fn list_listings(
    State(state): State<Arc<CatalogState>>,
    Query(query): Query<ListingQuery>,
) -> Json<Vec<Listing>> {
    let view = query.view_state();
    let store = state.store.lock().await;
    let mut projection = state.projection.lock().await;
    Json(projection.get(store.catalog(), &view).listings.clone())
}

async fn list_categories(State(state): State<Arc<CatalogState>>) -> Json<Vec<CategoryFilter>> {
    let store = state.store.lock().await;
    Json(categories(store.listings()))
}

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ActivationResponse {
    Payment {
        listing: Listing,
        price: String,
        instructions: PaymentInstructions,
    },
    Navigate {
        url: String,
    },
    None,
}

async fn activate_listing(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
) -> Result<Json<ActivationResponse>, AppError> {
    let store = state.store.lock().await;
    let listing = store
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::not_found(format!("listing '{id}' not found")))?;

    let response = match activate(listing) {
        Activation::ShowPaymentInstructions(listing) => ActivationResponse::Payment {
            listing: listing.clone(),
            price: listing.price.label(),
            instructions: state.payment.clone(),
        },
        Activation::Navigate(url) => ActivationResponse::Navigate {
            url: url.to_string(),
        },
        Activation::Nothing => ActivationResponse::None,
    };

    tracing::debug!(id = %id, "listing activated");
    Ok(Json(response))
}

async fn payment_info(State(state): State<Arc<CatalogState>>) -> Json<PaymentInstructions> {
    Json(state.payment.clone())
}

#[derive(Debug, Deserialize)]
struct UnlockRequest {
    code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub token: Uuid,
}

async fn unlock(
    State(state): State<Arc<CatalogState>>,
    Json(request): Json<UnlockRequest>,
) -> Result<Json<UnlockResponse>, AppError> {
    let mut admin = state.admin.lock().await;
    let outcome = admin.gate.submit_code(request.code);

    match outcome {
        GateOutcome::Granted => {
            let token = Uuid::new_v4();
            admin.token = Some(token);
            Ok(Json(UnlockResponse { token }))
        }
        GateOutcome::Rejected => {
            drop(admin);
            schedule_error_clear(state.clone());
            Err(AppError::unauthorized(
                "passcode_mismatch",
                "passcode did not match",
            ))
        }
    }
}

/// Clear the passcode error flag once the display delay has passed.
fn schedule_error_clear(state: Arc<CatalogState>) {
    tokio::spawn(async move {
        tokio::time::sleep(state.error_clear_delay).await;
        state.admin.lock().await.gate.clear_error();
    });
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminStatus {
    pub unlocked: bool,
    pub error_flag: bool,
}

async fn admin_status(State(state): State<Arc<CatalogState>>) -> Json<AdminStatus> {
    let admin = state.admin.lock().await;
    Json(AdminStatus {
        unlocked: admin.gate.is_granted(),
        error_flag: admin.gate.error_flag(),
    })
}

async fn close_admin(State(state): State<Arc<CatalogState>>) -> StatusCode {
    let mut admin = state.admin.lock().await;
    admin.gate.close();
    admin.token = None;
    tracing::info!("admin surface closed");
    StatusCode::NO_CONTENT
}

async fn create_listing(
    State(state): State<Arc<CatalogState>>,
    headers: HeaderMap,
    Json(candidate): Json<NewListing>,
) -> Result<(StatusCode, Json<Listing>), AppError> {
    state.require_admin(&headers).await?;

    let mut store = state.store.lock().await;
    match store.add(&candidate)? {
        Some(listing) => Ok((StatusCode::CREATED, Json(listing))),
        None => Err(AppError::validation("title", "title is required")),
    }
}

async fn delete_listing(
    State(state): State<Arc<CatalogState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.require_admin(&headers).await?;

    let mut store = state.store.lock().await;
    match store.remove(&id)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::not_found(format!("listing '{id}' not found"))),
    }
}
