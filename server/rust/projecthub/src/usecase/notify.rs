use std::sync::Arc;

use crate::domain::entity::notification::{DispatchOutcome, OutgoingMail, Recipient};
use crate::domain::repository::EmailTemplateRepository;
use crate::domain::service::Substitutions;
use crate::domain::value_object::TemplateType;
use crate::usecase::dispatcher::Dispatcher;

/// Envelope は宛先 1 件分の置換表と件名。
/// subject が None の場合はテンプレートの件名を置換して使う。
#[derive(Debug, Clone)]
pub struct Envelope {
    pub recipient: Recipient,
    pub substitutions: Substitutions,
    pub subject: Option<String>,
}

impl Envelope {
    pub fn new(recipient: Recipient, substitutions: Substitutions) -> Self {
        Self {
            recipient,
            substitutions,
            subject: None,
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

/// NotifyUseCase はテンプレートを 1 度読み込み、宛先ごとに置換して配信する。
/// テンプレートが存在しなければ何も送らずに空の結果を返す。
pub struct NotifyUseCase {
    template_repo: Arc<dyn EmailTemplateRepository>,
    dispatcher: Arc<Dispatcher>,
}

impl NotifyUseCase {
    pub fn new(template_repo: Arc<dyn EmailTemplateRepository>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            template_repo,
            dispatcher,
        }
    }

    pub async fn execute(
        &self,
        template_type: TemplateType,
        envelopes: Vec<Envelope>,
    ) -> Vec<DispatchOutcome> {
        let template = match self.template_repo.find_by_type(template_type).await {
            Ok(Some(t)) => t,
            Ok(None) => {
                tracing::debug!(template_type = %template_type, "template not registered; nothing sent");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(
                    template_type = %template_type,
                    error = %e,
                    "failed to load template; nothing sent"
                );
                return Vec::new();
            }
        };

        let mut outcomes = Vec::with_capacity(envelopes.len());
        for envelope in envelopes {
            let Some(email) = envelope.recipient.deliverable_email() else {
                tracing::debug!(
                    template_type = %template_type,
                    recipient = %envelope.recipient.name,
                    "recipient has no email address; skipped"
                );
                continue;
            };

            let subject = envelope
                .subject
                .unwrap_or_else(|| envelope.substitutions.render(&template.subject));
            let mail = OutgoingMail {
                to_email: email.to_string(),
                to_name: envelope.recipient.name.clone(),
                subject,
                html_body: envelope.substitutions.render(&template.body),
            };
            outcomes.push(self.dispatcher.dispatch(template_type, mail).await);
        }
        outcomes
    }
}
