use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::ErrorResponse;
use crate::usecase::get_dashboard::GetDashboardError;
use crate::usecase::get_template::GetTemplateError;
use crate::usecase::list_templates::ListTemplatesError;
use crate::usecase::update_template::UpdateTemplateError;

/// ApiError は REST ハンドラーのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "SYS_PMHUB_NOT_FOUND", msg.as_str()),
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "SYS_PMHUB_VALIDATION_ERROR",
                msg.as_str(),
            ),
            ApiError::Unauthenticated(msg) => (
                StatusCode::UNAUTHORIZED,
                "SYS_PMHUB_UNAUTHENTICATED",
                msg.as_str(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SYS_PMHUB_INTERNAL_ERROR",
                msg.as_str(),
            ),
        };

        let body = ErrorResponse::new(code, message);
        (status, Json(body)).into_response()
    }
}

impl From<GetDashboardError> for ApiError {
    fn from(e: GetDashboardError) -> Self {
        match e {
            GetDashboardError::InvalidLength(_) => ApiError::Validation(e.to_string()),
            GetDashboardError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<ListTemplatesError> for ApiError {
    fn from(e: ListTemplatesError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<GetTemplateError> for ApiError {
    fn from(e: GetTemplateError) -> Self {
        match e {
            GetTemplateError::NotFound(_) => ApiError::NotFound(e.to_string()),
            GetTemplateError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<UpdateTemplateError> for ApiError {
    fn from(e: UpdateTemplateError) -> Self {
        match e {
            UpdateTemplateError::NotFound(_) => ApiError::NotFound(e.to_string()),
            UpdateTemplateError::Validation(msg) => ApiError::Validation(msg),
            UpdateTemplateError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::TemplateType;

    #[test]
    fn use_case_errors_map_to_status_codes() {
        let cases = [
            (
                ApiError::from(GetTemplateError::NotFound(TemplateType::Meeting)),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(GetDashboardError::InvalidLength(0)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(UpdateTemplateError::Internal("db".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Unauthenticated("missing".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
