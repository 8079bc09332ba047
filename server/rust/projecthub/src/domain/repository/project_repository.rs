use async_trait::async_trait;

use crate::domain::entity::project::Project;
use crate::domain::entity::user::User;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Project>>;
    /// 編集権限を持つプロジェクトメンバーを返す。
    async fn find_editors(&self, project_id: i64) -> anyhow::Result<Vec<User>>;
}
