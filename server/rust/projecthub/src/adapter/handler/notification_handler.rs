use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::caller::CallerId;
use super::error::ApiError;
use super::AppState;
use crate::usecase::{AccountEmail, ActivityEvent, ScheduleEvent};

#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub accepted: bool,
    pub dispatched: usize,
}

impl AcceptedResponse {
    fn new(dispatched: usize) -> (StatusCode, Json<Self>) {
        (
            StatusCode::ACCEPTED,
            Json(Self {
                accepted: true,
                dispatched,
            }),
        )
    }
}

/// AccountEmailResponse は即時送信の結果。sent が false の場合はテンプレート未登録か宛先不備で送信していない。
#[derive(Debug, Serialize)]
pub struct AccountEmailResponse {
    pub sent: bool,
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/v1/notifications/activity
///
/// ヘッダーとボディが受理できれば通知の成否にかかわらず 202 を返す。
pub async fn trigger_activity(
    State(state): State<AppState>,
    CallerId(actor_id): CallerId,
    Json(event): Json<ActivityEvent>,
) -> (StatusCode, Json<AcceptedResponse>) {
    let dispatched = match state.user_repo.find_by_id(actor_id).await {
        Ok(Some(actor)) => state.send_activity_uc.execute(&actor, &event).await.len(),
        Ok(None) => {
            tracing::warn!(actor_id, event = event.name(), "unknown actor; notification skipped");
            0
        }
        Err(e) => {
            tracing::warn!(actor_id, event = event.name(), error = %e, "failed to load actor; notification skipped");
            0
        }
    };

    AcceptedResponse::new(dispatched)
}

/// POST /api/v1/notifications/schedule
pub async fn trigger_schedule(
    State(state): State<AppState>,
    CallerId(actor_id): CallerId,
    Json(event): Json<ScheduleEvent>,
) -> (StatusCode, Json<AcceptedResponse>) {
    let dispatched = state.send_schedule_uc.execute(&event).await.len();
    tracing::debug!(actor_id, event = event.name(), dispatched, "schedule notification handled");
    AcceptedResponse::new(dispatched)
}

/// POST /api/v1/notifications/account
///
/// 送信は同期で行い、トランスポートの失敗は status: false として 200 で返す。
pub async fn send_account_email(
    State(state): State<AppState>,
    CallerId(actor_id): CallerId,
    Json(email): Json<AccountEmail>,
) -> Result<Json<AccountEmailResponse>, ApiError> {
    let user_id = email.user_id();
    let user = state
        .user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {user_id}")))?;

    let response = match state.send_account_uc.execute(&user, &email).await {
        Some(result) => AccountEmailResponse {
            sent: true,
            status: result.status,
            message: result.message,
        },
        None => AccountEmailResponse {
            sent: false,
            status: true,
            message: None,
        },
    };
    tracing::debug!(
        actor_id,
        user_id,
        event = email.name(),
        sent = response.sent,
        status = response.status,
        "account email handled"
    );
    Ok(Json(response))
}
