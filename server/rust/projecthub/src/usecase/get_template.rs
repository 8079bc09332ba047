use std::sync::Arc;

use crate::domain::entity::email_template::EmailTemplate;
use crate::domain::repository::EmailTemplateRepository;
use crate::domain::value_object::TemplateType;

#[derive(Debug, thiserror::Error)]
pub enum GetTemplateError {
    #[error("template not found: {0}")]
    NotFound(TemplateType),

    #[error("internal error: {0}")]
    Internal(String),
}

pub struct GetTemplateUseCase {
    repo: Arc<dyn EmailTemplateRepository>,
}

impl GetTemplateUseCase {
    pub fn new(repo: Arc<dyn EmailTemplateRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, template_type: TemplateType) -> Result<EmailTemplate, GetTemplateError> {
        self.repo
            .find_by_type(template_type)
            .await
            .map_err(|e| GetTemplateError::Internal(e.to_string()))?
            .ok_or(GetTemplateError::NotFound(template_type))
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
            .withf(|t| *t == TemplateType::DefectUpdated)
            .returning(|t| Ok(Some(EmailTemplate::new(3, t, "Defect updated", "{STATUS}"))));

        let uc = GetTemplateUseCase::new(Arc::new(mock));
        let template = uc.execute(TemplateType::DefectUpdated).await.unwrap();
        assert_eq!(template.subject, "Defect updated");
    }

    #[tokio::test]
    async fn not_found() {
        let mut mock = MockEmailTemplateRepository::new();
        mock.expect_find_by_type().returning(|_| Ok(None));

        let uc = GetTemplateUseCase::new(Arc::new(mock));
        match uc.execute(TemplateType::Meeting).await.unwrap_err() {
            GetTemplateError::NotFound(t) => assert_eq!(t, TemplateType::Meeting),
            e => unreachable!("unexpected error: {:?}", e),
        }
    }
}
