use async_trait::async_trait;

use crate::domain::entity::notification::OutgoingMail;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("delivery rejected: {0}")]
    Rejected(String),

    #[error("delivery error: {0}")]
    Other(String),
}

/// MailTransport は完成済みの HTML メールを 1 通送信する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError>;
}
