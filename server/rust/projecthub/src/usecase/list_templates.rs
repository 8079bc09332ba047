use std::sync::Arc;

use crate::domain::entity::email_template::EmailTemplate;
use crate::domain::repository::EmailTemplateRepository;

#[derive(Debug, thiserror::Error)]
pub enum ListTemplatesError {
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct ListTemplatesUseCase {
    repo: Arc<dyn EmailTemplateRepository>,
}

impl ListTemplatesUseCase {
    pub fn new(repo: Arc<dyn EmailTemplateRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> Result<Vec<EmailTemplate>, ListTemplatesError> {
        self.repo
            .find_all()
            .await
            .map_err(|e| ListTemplatesError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::email_template_repository::MockEmailTemplateRepository;
    use crate::domain::value_object::TemplateType;

    #[tokio::test]
    async fn success() {
        let mut mock = MockEmailTemplateRepository::new();
        mock.expect_find_all().returning(|| {
            Ok(vec![
                EmailTemplate::new(1, TemplateType::Meeting, "Meeting", "<p>{NAME}</p>"),
                EmailTemplate::new(2, TemplateType::TaskComments, "Comment", "<p>{POSTED_BY}</p>"),
            ])
        });

        let uc = ListTemplatesUseCase::new(Arc::new(mock));
        let templates = uc.execute().await.unwrap();
        assert_eq!(templates.len(), 2);
    }

    #[tokio::test]
    async fn internal_error() {
        let mut mock = MockEmailTemplateRepository::new();
        mock.expect_find_all()
            .returning(|| Err(anyhow::anyhow!("db error")));

        let uc = ListTemplatesUseCase::new(Arc::new(mock));
        assert!(matches!(uc.execute().await, Err(ListTemplatesError::Internal(_))));
    }
}
