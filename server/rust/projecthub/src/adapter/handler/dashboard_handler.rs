use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use super::caller::CallerId;
use super::error::ApiError;
use super::AppState;
use crate::domain::entity::dashboard::DashboardSnapshot;

/// 一覧部分の既定件数と上限。
const DEFAULT_LENGTH: i64 = 10;
const MAX_LENGTH: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default = "default_length")]
    pub length: i64,
}

fn default_length() -> i64 {
    DEFAULT_LENGTH
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    state.metrics.record_dashboard_request();

    let user = state
        .user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::Unauthenticated(format!("unknown user: {user_id}")))?;

    let snapshot = state
        .get_dashboard_uc
        .execute(&user, query.length.min(MAX_LENGTH))
        .await?;
    Ok(Json(snapshot))
}
