use async_trait::async_trait;

use crate::domain::entity::dashboard::StatusCount;
use crate::domain::entity::project::ProjectWithMembers;
use crate::domain::entity::work_item::WorkItemWithAssignee;
use crate::domain::value_object::{ProjectScope, WorkItemKind, WorkItemScope};

/// DashboardRepository はダッシュボード用の読み取り専用クエリ群。
/// 可視範囲は呼び出し側で解決済みのスコープとして受け取る。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// 終了系ステータス以外のプロジェクト件数。
    async fn count_active_projects(&self, scope: ProjectScope) -> anyhow::Result<i64>;

    /// (status, 件数) の組。
    async fn project_status_counts(&self, scope: ProjectScope) -> anyhow::Result<Vec<(i16, i64)>>;

    /// 終了系以外のプロジェクトを作成日時の降順で最大 limit 件。
    async fn recent_projects(
        &self,
        scope: ProjectScope,
        limit: i64,
    ) -> anyhow::Result<Vec<ProjectWithMembers>>;

    /// 担当者または作成者が user_id で、終了系以外の件数。
    async fn count_pending(&self, kind: WorkItemKind, user_id: i64) -> anyhow::Result<i64>;

    async fn status_counts(
        &self,
        kind: WorkItemKind,
        scope: WorkItemScope,
    ) -> anyhow::Result<Vec<StatusCount>>;

    /// 開始日が year 年に含まれる項目の (月, 件数)。
    async fn monthly_counts(
        &self,
        kind: WorkItemKind,
        scope: WorkItemScope,
        year: i32,
    ) -> anyhow::Result<Vec<(u32, i64)>>;

    /// 担当者または作成者が user_id の未完了項目を作成日時の降順で最大 limit 件。
    async fn recent_pending_items(
        &self,
        kind: WorkItemKind,
        user_id: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<WorkItemWithAssignee>>;
}
