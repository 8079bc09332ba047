use async_trait::async_trait;

use crate::domain::entity::email_template::EmailTemplate;
use crate::domain::value_object::TemplateType;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailTemplateRepository: Send + Sync {
    async fn find_by_type(&self, template_type: TemplateType) -> anyhow::Result<Option<EmailTemplate>>;
    async fn find_all(&self) -> anyhow::Result<Vec<EmailTemplate>>;
    async fn update(&self, template: &EmailTemplate) -> anyhow::Result<()>;
}
