use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::repository::SettingRepository;

pub struct SettingPostgresRepository {
    pool: Arc<PgPool>,
}

impl SettingPostgresRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingRepository for SettingPostgresRepository {
    async fn announcement_notification_enabled(&self) -> anyhow::Result<bool> {
        let enabled: Option<bool> = sqlx::query_scalar(
            "SELECT is_announcement_notification FROM projecthub.settings ORDER BY id LIMIT 1",
        )
        .fetch_optional(self.pool.as_ref())
        .await?;
        Ok(enabled.unwrap_or(false))
    }
}
