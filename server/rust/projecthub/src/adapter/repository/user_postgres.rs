use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;

/// users テーブルの取得カラム。エイリアス u を前提とする。
pub(crate) const USER_COLUMNS: &str = "u.id, u.firstname, u.lastname, u.username, u.email, u.avatar, \
     u.email_verification_code, u.is_client, u.is_admin, u.is_super_admin";

pub struct UserPostgresRepository {
    pool: Arc<PgPool>,
}

impl UserPostgresRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    id: i64,
    firstname: String,
    lastname: String,
    username: String,
    email: String,
    avatar: Option<String>,
    email_verification_code: Option<String>,
    is_client: bool,
    is_admin: bool,
    is_super_admin: bool,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            firstname: r.firstname,
            lastname: r.lastname,
            username: r.username,
            email: r.email,
            avatar: r.avatar,
            email_verification_code: r.email_verification_code,
            is_client: r.is_client,
            is_admin: r.is_admin,
            is_super_admin: r.is_super_admin,
        }
    }
}

#[async_trait]
impl UserRepository for UserPostgresRepository {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM projecthub.users u WHERE u.id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM projecthub.users u WHERE u.id = ANY($1) ORDER BY u.id"
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(ids)
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
