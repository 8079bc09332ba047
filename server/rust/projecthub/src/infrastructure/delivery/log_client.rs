use async_trait::async_trait;

use crate::domain::entity::notification::OutgoingMail;
use crate::domain::service::{DeliveryError, MailTransport};

/// LogMailTransport は SMTP 未設定時に使う送信先なしのトランスポート。送信内容をログに出すだけで常に成功する。
#[derive(Debug, Default)]
pub struct LogMailTransport;

impl LogMailTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError> {
        tracing::info!(
            recipient = %mail.to_email,
            recipient_name = %mail.to_name,
            subject = %mail.subject,
            body_len = mail.html_body.len(),
            "mail transport not configured; message logged only"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_succeeds() {
        let mail = OutgoingMail {
            to_email: "a@example.com".to_string(),
            to_name: "A".to_string(),
            subject: "s".to_string(),
            html_body: "<p>b</p>".to_string(),
        };
        tokio_test::assert_ok!(LogMailTransport::new().send(&mail).await);
    }
}
