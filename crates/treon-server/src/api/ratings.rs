use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use treon_core::Rating;
use treon_ratings::{
    aggregate, format_popular, format_popular_shade, format_rating, pick_popular,
    pick_popular_shade, AggregationResult, BrandShadeStats, BrandStats, PopularitySelection,
    ShadePopularitySelection,
};
use treon_store::{parse_record, NewRating};

use crate::middleware::RequestId;

use super::{with_store, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct PopularData {
    brand: PopularitySelection,
    shade: ShadePopularitySelection,
    /// `"MAC (4.3⭐)"` or `"N/A"`.
    brand_display: String,
    shade_display: String,
}

#[derive(Debug, Serialize)]
pub(super) struct BrandDetail {
    #[serde(flatten)]
    stats: BrandStats,
    display: String,
    shades: Vec<BrandShadeStats>,
}

#[derive(Debug, Serialize)]
pub(super) struct ShadeDetail {
    #[serde(flatten)]
    stats: BrandShadeStats,
    display: String,
}

async fn load_result(state: &AppState, request_id: &str) -> Result<AggregationResult, ApiError> {
    let ratings = with_store(state, request_id, |store| store.ratings()).await?;
    Ok(aggregate(&ratings))
}

/// GET /api/v1/ratings/summary
pub(super) async fn summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AggregationResult>>, ApiError> {
    let result = load_result(&state, &req_id.0).await?;
    Ok(Json(ApiResponse::new(result, req_id.0)))
}

/// GET /api/v1/ratings/popular
pub(super) async fn popular(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<PopularData>>, ApiError> {
    let result = load_result(&state, &req_id.0).await?;
    let brand = pick_popular(&result.brands);
    let shade = pick_popular_shade(&result.brand_shades);

    let data = PopularData {
        brand_display: format_popular(&brand),
        shade_display: format_popular_shade(&shade),
        brand,
        shade,
    };
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

/// GET /api/v1/ratings/brands/{brand}
pub(super) async fn brand_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(brand): Path<String>,
) -> Result<Json<ApiResponse<BrandDetail>>, ApiError> {
    let result = load_result(&state, &req_id.0).await?;
    let stats = result.brand(&brand).cloned().ok_or_else(|| {
        ApiError::new(&req_id.0, "not_found", format!("no ratings for brand '{brand}'"))
    })?;

    let data = BrandDetail {
        display: format_rating(&stats.rollup),
        shades: result.shades_for(&brand).cloned().collect(),
        stats,
    };
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

/// GET /api/v1/ratings/brands/{brand}/shades/{shade}
pub(super) async fn shade_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((brand, shade)): Path<(String, String)>,
) -> Result<Json<ApiResponse<ShadeDetail>>, ApiError> {
    let result = load_result(&state, &req_id.0).await?;
    let stats = result.shade(&brand, &shade).cloned().ok_or_else(|| {
        ApiError::new(
            &req_id.0,
            "not_found",
            format!("no ratings for '{shade}' by '{brand}'"),
        )
    })?;

    let data = ShadeDetail {
        display: format_rating(&stats.rollup),
        stats,
    };
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

/// POST /api/v1/ratings
pub(super) async fn submit_rating(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Rating>>), ApiError> {
    let Json(body) = body.map_err(|e| ApiError::new(&req_id.0, "bad_request", e.body_text()))?;
    let new: NewRating = parse_record(body)
        .map_err(|e| ApiError::new(&req_id.0, "bad_request", format!("invalid rating body: {e}")))?;

    let _guard = state.write_lock.lock().await;
    let stored = with_store(&state, &req_id.0, move |store| store.submit_rating(new)).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(stored, req_id.0))))
}
