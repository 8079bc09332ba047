use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::user_postgres::{UserRow, USER_COLUMNS};
use crate::domain::entity::project::Project;
use crate::domain::entity::user::User;
use crate::domain::repository::ProjectRepository;

pub struct ProjectPostgresRepository {
    pool: Arc<PgPool>,
}

impl ProjectPostgresRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProjectRow {
    pub(crate) id: i64,
    project_name: String,
    status: i16,
    client_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(r: ProjectRow) -> Self {
        Project {
            id: r.id,
            project_name: r.project_name,
            status: r.status,
            client_id: r.client_id,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl ProjectRepository for ProjectPostgresRepository {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Project>> {
        let row: Option<ProjectRow> = sqlx::query_as(
            "SELECT id, project_name, status, client_id, created_at \
             FROM projecthub.projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_editors(&self, project_id: i64) -> anyhow::Result<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM projecthub.project_members pm \
             JOIN projecthub.users u ON u.id = pm.user_id \
             WHERE pm.project_id = $1 AND pm.edit ORDER BY u.id"
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(project_id)
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
