use async_trait::async_trait;

use crate::domain::entity::user::User;
use crate::domain::entity::work_item::WorkItem;
use crate::domain::value_object::WorkItemKind;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkItemRepository: Send + Sync {
    async fn find_by_id(&self, kind: WorkItemKind, id: i64) -> anyhow::Result<Option<WorkItem>>;
    async fn find_members(&self, kind: WorkItemKind, id: i64) -> anyhow::Result<Vec<User>>;
}
