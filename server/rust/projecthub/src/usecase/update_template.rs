use std::sync::Arc;

use crate::domain::entity::email_template::EmailTemplate;
use crate::domain::repository::EmailTemplateRepository;
use crate::domain::value_object::TemplateType;

#[derive(Debug, Clone)]
pub struct UpdateTemplateInput {
    pub template_type: TemplateType,
    pub subject: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateTemplateError {
    #[error("template not found: {0}")]
    NotFound(TemplateType),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub struct UpdateTemplateUseCase {
    repo: Arc<dyn EmailTemplateRepository>,
}

impl UpdateTemplateUseCase {
    pub fn new(repo: Arc<dyn EmailTemplateRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: &UpdateTemplateInput) -> Result<EmailTemplate, UpdateTemplateError> {
        if input.subject.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(UpdateTemplateError::Validation("subject must not be empty".to_string()));
        }
        if input.body.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err(UpdateTemplateError::Validation("body must not be empty".to_string()));
        }

        let mut template = self
            .repo
            .find_by_type(input.template_type)
            .await
            .map_err(|e| UpdateTemplateError::Internal(e.to_string()))?
            .ok_or(UpdateTemplateError::NotFound(input.template_type))?;

        if let Some(ref subject) = input.subject {
            template.subject = subject.clone();
        }
        if let Some(ref body) = input.body {
            template.body = body.clone();
        }
        template.updated_at = chrono::Utc::now();

        self.repo
            .update(&template)
            .await
            .map_err(|e| UpdateTemplateError::Internal(e.to_string()))?;

        tracing::info!(template_type = %input.template_type, "email template updated");
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::email_template_repository::MockEmailTemplateRepository;

    #[tokio::test]
    async fn success() {
        let mut mock = MockEmailTemplateRepository::new();
        mock.expect_find_by_type()
            .returning(|t| Ok(Some(EmailTemplate::new(1, t, "Old", "<p>old</p>"))));
        mock.expect_update()
            .withf(|t| t.subject == "New" && t.body == "<p>old</p>")
            .times(1)
            .returning(|_| Ok(()));

        let uc = UpdateTemplateUseCase::new(Arc::new(mock));
        let input = UpdateTemplateInput {
            template_type: TemplateType::ProjectComments,
            subject: Some("New".to_string()),
            body: None,
        };
        let updated = uc.execute(&input).await.unwrap();
        assert_eq!(updated.subject, "New");
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let mock = MockEmailTemplateRepository::new();
        let uc = UpdateTemplateUseCase::new(Arc::new(mock));
        let input = UpdateTemplateInput {
            template_type: TemplateType::ProjectComments,
            subject: None,
            body: Some("   ".to_string()),
        };
        assert!(matches!(
            uc.execute(&input).await,
            Err(UpdateTemplateError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn not_found() {
        let mut mock = MockEmailTemplateRepository::new();
        mock.expect_find_by_type().returning(|_| Ok(None));
        mock.expect_update().never();

        let uc = UpdateTemplateUseCase::new(Arc::new(mock));
        let input = UpdateTemplateInput {
            template_type: TemplateType::Announcement,
            subject: Some("x".to_string()),
            body: None,
        };
        assert!(matches!(
            uc.execute(&input).await,
            Err(UpdateTemplateError::NotFound(TemplateType::Announcement))
        ));
    }
}
