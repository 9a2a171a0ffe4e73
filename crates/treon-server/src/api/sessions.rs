use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use treon_core::Session;
use treon_ratings::{
    format_duration, recent_sessions, session_overview, weekly_breakdown, DurationStats,
    WeeklyBreakdown,
};

use crate::middleware::RequestId;

use super::{normalize_limit, with_store, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct WindowAverage {
    #[serde(flatten)]
    stats: DurationStats,
    /// `"3m 5s"`.
    display: String,
}

impl From<DurationStats> for WindowAverage {
    fn from(stats: DurationStats) -> Self {
        Self {
            display: format_duration(stats.average_seconds),
            stats,
        }
    }
}

/// All-time figures at the top level, windowed ones nested.
#[derive(Debug, Serialize)]
pub(super) struct AverageData {
    #[serde(flatten)]
    overall: WindowAverage,
    today: WindowAverage,
    last_7_days: WindowAverage,
    unique_users: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct WeeklyQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RecentQuery {
    pub limit: Option<usize>,
}

/// GET /api/v1/sessions/average
pub(super) async fn average(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AverageData>>, ApiError> {
    let sessions = with_store(&state, &req_id.0, |store| store.sessions()).await?;
    let overview = session_overview(&sessions, Utc::now());

    let data = AverageData {
        overall: overview.overall.into(),
        today: overview.today.into(),
        last_7_days: overview.last_7_days.into(),
        unique_users: overview.unique_users,
    };
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

/// GET /api/v1/sessions/weekly?year=&month= (defaults to the current month)
pub(super) async fn weekly(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<WeeklyQuery>,
) -> Result<Json<ApiResponse<WeeklyBreakdown>>, ApiError> {
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let (sessions, daily) = with_store(&state, &req_id.0, |store| {
        Ok((store.sessions()?, store.daily_records()?))
    })
    .await?;

    let breakdown = weekly_breakdown(&sessions, &daily, year, month).ok_or_else(|| {
        ApiError::new(
            &req_id.0,
            "validation_error",
            format!("invalid month {month}; expected 1-12"),
        )
    })?;
    Ok(Json(ApiResponse::new(breakdown, req_id.0)))
}

/// GET /api/v1/sessions/recent?limit=
pub(super) async fn recent(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<ApiResponse<Vec<Session>>>, ApiError> {
    let limit = normalize_limit(query.limit, state.recent_sessions_limit);
    let sessions = with_store(&state, &req_id.0, |store| store.sessions()).await?;

    let data = recent_sessions(&sessions, limit)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(ApiResponse::new(data, req_id.0)))
}
