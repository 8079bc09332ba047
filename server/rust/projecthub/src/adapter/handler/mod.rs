pub mod caller;
pub mod dashboard_handler;
pub mod error;
pub mod health;
pub mod notification_handler;
pub mod template_handler;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::domain::repository::UserRepository;
use crate::infrastructure::metrics::Metrics;
use crate::usecase::{
    GetDashboardUseCase, GetTemplateUseCase, ListTemplatesUseCase, SendAccountEmailUseCase,
    SendActivityNotificationUseCase, SendScheduleNotificationUseCase, UpdateTemplateUseCase,
};

/// AppState はアプリケーション全体の共有状態を表す。
#[derive(Clone)]
pub struct AppState {
    pub get_dashboard_uc: Arc<GetDashboardUseCase>,
    pub list_templates_uc: Arc<ListTemplatesUseCase>,
    pub get_template_uc: Arc<GetTemplateUseCase>,
    pub update_template_uc: Arc<UpdateTemplateUseCase>,
    pub send_activity_uc: Arc<SendActivityNotificationUseCase>,
    pub send_schedule_uc: Arc<SendScheduleNotificationUseCase>,
    pub send_account_uc: Arc<SendAccountEmailUseCase>,
    pub user_repo: Arc<dyn UserRepository>,
    pub metrics: Arc<Metrics>,
}

/// REST API ルーターを構築する。
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health / Readiness / Metrics
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard_handler::get_dashboard))
        // Email templates
        .route(
            "/api/v1/email-templates",
            get(template_handler::list_templates),
        )
        .route(
            "/api/v1/email-templates/{template_type}",
            get(template_handler::get_template).put(template_handler::update_template),
        )
        // Notifications
        .route(
            "/api/v1/notifications/activity",
            post(notification_handler::trigger_activity),
        )
        .route(
            "/api/v1/notifications/schedule",
            post(notification_handler::trigger_schedule),
        )
        .route(
            "/api/v1/notifications/account",
            post(notification_handler::send_account_email),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// ErrorResponse は統一エラーレスポンス。
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}
