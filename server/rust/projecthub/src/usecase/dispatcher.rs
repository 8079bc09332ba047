use std::sync::Arc;
use std::time::Duration;

use crate::domain::entity::notification::{DispatchOutcome, NotificationJob, OutgoingMail};
use crate::domain::service::{JobQueue, MailTransport};
use crate::domain::value_object::{DispatchMode, TemplateType};
use crate::infrastructure::metrics::Metrics;

/// 遅延送信ジョブが実行可能になるまでの固定遅延。
pub const DISPATCH_DELAY: Duration = Duration::from_secs(5);

/// Dispatcher はテンプレート種別の配信方式に従って 1 通を送る。
/// どちらの経路でも失敗は呼び出し元へ伝播させず、結果値として返す。
pub struct Dispatcher {
    mailer: Arc<dyn MailTransport>,
    queue: Arc<dyn JobQueue>,
    metrics: Arc<Metrics>,
}

impl Dispatcher {
    pub fn new(
        mailer: Arc<dyn MailTransport>,
        queue: Arc<dyn JobQueue>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            mailer,
            queue,
            metrics,
        }
    }

    pub async fn dispatch(&self, template_type: TemplateType, mail: OutgoingMail) -> DispatchOutcome {
        let mode = template_type.dispatch_mode();
        let outcome = match mode {
            DispatchMode::Immediate => self.send_now(template_type, &mail).await,
            DispatchMode::Delayed => self.send_later(template_type, mail).await,
        };
        self.metrics
            .record_notification(template_type.as_str(), mode.as_str(), outcome.as_str());
        outcome
    }

    async fn send_now(&self, template_type: TemplateType, mail: &OutgoingMail) -> DispatchOutcome {
        match self.mailer.send(mail).await {
            Ok(()) => {
                tracing::info!(
                    template_type = %template_type,
                    recipient = %mail.to_email,
                    "notification sent"
                );
                DispatchOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(
                    template_type = %template_type,
                    recipient = %mail.to_email,
                    error = %e,
                    "failed to send notification"
                );
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }

    async fn send_later(&self, template_type: TemplateType, mail: OutgoingMail) -> DispatchOutcome {
        let recipient = mail.to_email.clone();
        let job = NotificationJob {
            recipient_email: mail.to_email,
            recipient_name: mail.to_name,
            subject: mail.subject,
            body: mail.html_body,
            delay: DISPATCH_DELAY,
        };
        match self.queue.enqueue(job).await {
            Ok(()) => {
                tracing::debug!(
                    template_type = %template_type,
                    recipient = %recipient,
                    "notification queued"
                );
                DispatchOutcome::Queued
            }
            Err(e) => {
                tracing::error!(
                    template_type = %template_type,
                    recipient = %recipient,
                    error = %e,
                    "failed to enqueue notification; dropped"
                );
                DispatchOutcome::Dropped(e.to_string())
            }
        }
    }
}
