use std::sync::Arc;

use chrono::Datelike;

use crate::domain::entity::dashboard::{empty_histogram, DashboardSnapshot, ProjectCountByStatus};
use crate::domain::entity::user::User;
use crate::domain::repository::DashboardRepository;
use crate::domain::value_object::{DashboardScope, WorkItemKind};

#[derive(Debug, thiserror::Error)]
pub enum GetDashboardError {
    #[error("invalid length: {0}")]
    InvalidLength(i64),

    #[error("internal error: {0}")]
    Internal(String),
}

/// GetDashboardUseCase はユーザーの可視範囲を一度解決し、固定のクエリ群を毎回実行して集計する。
pub struct GetDashboardUseCase {
    repo: Arc<dyn DashboardRepository>,
}

impl GetDashboardUseCase {
    pub fn new(repo: Arc<dyn DashboardRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user: &User, limit: i64) -> Result<DashboardSnapshot, GetDashboardError> {
        self.execute_for_year(user, limit, chrono::Utc::now().year())
            .await
    }

    /// 月別件数の対象年を指定して集計する。
    pub async fn execute_for_year(
        &self,
        user: &User,
        limit: i64,
        year: i32,
    ) -> Result<DashboardSnapshot, GetDashboardError> {
        if limit < 1 {
            return Err(GetDashboardError::InvalidLength(limit));
        }
        let scope = DashboardScope::resolve(user);
        let internal = |e: anyhow::Error| GetDashboardError::Internal(e.to_string());

        let total_projects = self
            .repo
            .count_active_projects(scope.projects)
            .await
            .map_err(internal)?;
        let pending_tasks = self
            .repo
            .count_pending(WorkItemKind::Task, scope.user_id)
            .await
            .map_err(internal)?;
        let pending_defects = self
            .repo
            .count_pending(WorkItemKind::Defect, scope.user_id)
            .await
            .map_err(internal)?;
        let pending_incidents = self
            .repo
            .count_pending(WorkItemKind::Incident, scope.user_id)
            .await
            .map_err(internal)?;

        let project_count_by_status = ProjectCountByStatus::from_counts(
            &self
                .repo
                .project_status_counts(scope.projects)
                .await
                .map_err(internal)?,
        );
        let task_count_by_status = self
            .repo
            .status_counts(WorkItemKind::Task, scope.work_items)
            .await
            .map_err(internal)?;

        let mut count_by_month = empty_histogram();
        for kind in WorkItemKind::ALL {
            let counts = self
                .repo
                .monthly_counts(kind, scope.work_items, year)
                .await
                .map_err(internal)?;
            for (month, total) in counts {
                let Some(bucket) = count_by_month.get_mut(&month) else {
                    tracing::warn!(month, kind = %kind, "month outside 1..=12 ignored");
                    continue;
                };
                match kind {
                    WorkItemKind::Task => bucket.tasks = total,
                    WorkItemKind::Defect => bucket.defects = total,
                    WorkItemKind::Incident => bucket.incidents = total,
                }
            }
        }

        let projects = self
            .repo
            .recent_projects(scope.projects, limit)
            .await
            .map_err(internal)?;
        let tasks = self
            .repo
            .recent_pending_items(WorkItemKind::Task, scope.user_id, limit)
            .await
            .map_err(internal)?;
        let defects = self
            .repo
            .recent_pending_items(WorkItemKind::Defect, scope.user_id, limit)
            .await
            .map_err(internal)?;
        let incidents = self
            .repo
            .recent_pending_items(WorkItemKind::Incident, scope.user_id, limit)
            .await
            .map_err(internal)?;

        tracing::debug!(
            user_id = user.id,
            total_projects,
            pending_tasks,
            "dashboard snapshot built"
        );

        Ok(DashboardSnapshot {
            total_projects,
            pending_tasks,
            pending_defects,
            pending_incidents,
            project_count_by_status,
            task_count_by_status,
            count_by_month,
            projects,
            tasks,
            defects,
            incidents,
        })
    }
}
