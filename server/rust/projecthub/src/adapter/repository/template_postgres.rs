use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entity::email_template::EmailTemplate;
use crate::domain::repository::EmailTemplateRepository;
use crate::domain::value_object::TemplateType;

pub struct TemplatePostgresRepository {
    pool: Arc<PgPool>,
}

impl TemplatePostgresRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: i64,
    #[sqlx(rename = "type")]
    template_type: String,
    template_subject: String,
    template_body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TemplateRow> for EmailTemplate {
    type Error = anyhow::Error;

    fn try_from(r: TemplateRow) -> Result<Self, Self::Error> {
        Ok(EmailTemplate {
            id: r.id,
            template_type: r.template_type.parse::<TemplateType>()?,
            subject: r.template_subject,
            body: r.template_body,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[async_trait]
impl EmailTemplateRepository for TemplatePostgresRepository {
    async fn find_by_type(&self, template_type: TemplateType) -> anyhow::Result<Option<EmailTemplate>> {
        let row: Option<TemplateRow> = sqlx::query_as(
            "SELECT id, type, template_subject, template_body, created_at, updated_at \
             FROM projecthub.email_templates WHERE type = $1",
        )
        .bind(template_type.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<EmailTemplate>> {
        let rows: Vec<TemplateRow> = sqlx::query_as(
            "SELECT id, type, template_subject, template_body, created_at, updated_at \
             FROM projecthub.email_templates ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                EmailTemplate::try_from(row)
                    .map_err(|e| tracing::warn!(id, error = %e, "skipping template with unknown type"))
                    .ok()
            })
            .collect())
    }

    async fn update(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE projecthub.email_templates \
             SET template_subject = $2, template_body = $3, updated_at = $4 \
             WHERE type = $1",
        )
        .bind(template.template_type.as_str())
        .bind(&template.subject)
        .bind(&template.body)
        .bind(template.updated_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }
}
