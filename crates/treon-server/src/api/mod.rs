mod ratings;
mod sessions;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use treon_store::{FileStore, StoreError};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

const MAX_RECENT_SESSIONS: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FileStore>,
    /// Serializes rating submissions; the ratings file is rewritten whole.
    pub write_lock: Arc<Mutex<()>>,
    pub recent_sessions_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<FileStore>, recent_sessions_limit: usize) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
            recent_sessions_limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: bool,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, MAX_RECENT_SESSIONS)
}

pub(super) fn map_store_error(request_id: &str, error: &StoreError) -> ApiError {
    match error {
        StoreError::InvalidRating(reason) => {
            ApiError::new(request_id, "validation_error", format!("invalid rating: {reason}"))
        }
        _ => {
            tracing::error!(error = %error, "data store access failed");
            ApiError::new(request_id, "internal_error", "failed to access rating data")
        }
    }
}

/// Run blocking store I/O off the async runtime.
pub(super) async fn with_store<T, F>(state: &AppState, request_id: &str, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&FileStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "store task failed");
            ApiError::new(request_id, "internal_error", "store task failed")
        })?
        .map_err(|e| map_store_error(request_id, &e))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/ratings", post(ratings::submit_rating))
        .route("/api/v1/ratings/summary", get(ratings::summary))
        .route("/api/v1/ratings/popular", get(ratings::popular))
        .route("/api/v1/ratings/brands/{brand}", get(ratings::brand_detail))
        .route(
            "/api/v1/ratings/brands/{brand}/shades/{shade}",
            get(ratings::shade_detail),
        )
        .route("/api/v1/sessions/average", get(sessions::average))
        .route("/api/v1/sessions/weekly", get(sessions::weekly))
        .route("/api/v1/sessions/recent", get(sessions::recent))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            catalog: state.store.catalog().is_some(),
        },
        req_id.0,
    ))
}
