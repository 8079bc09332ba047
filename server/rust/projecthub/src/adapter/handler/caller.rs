use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;

/// 上流ゲートウェイが認証済みユーザーの ID を設定するヘッダー。
pub const USER_ID_HEADER: &str = "x-user-id";

/// CallerId はリクエスト元ユーザーの ID を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub i64);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthenticated("missing X-User-Id header".to_string()))?;
        raw.to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(CallerId)
            .ok_or_else(|| ApiError::Validation("invalid X-User-Id header".to_string()))
    }
}
