use async_trait::async_trait;

use crate::domain::entity::user::User;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    /// 存在する ID のユーザーだけを返す。順序は ID 昇順。
    async fn find_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<User>>;
}
