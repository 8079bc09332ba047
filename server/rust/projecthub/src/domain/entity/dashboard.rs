use std::collections::BTreeMap;

use serde::Serialize;

use super::project::ProjectWithMembers;
use super::work_item::WorkItemWithAssignee;
use crate::domain::value_object::ProjectStatus;

/// ProjectCountByStatus はプロジェクトのステータス別件数。値がなくても全フィールドを返す。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectCountByStatus {
    pub all: i64,
    pub open: i64,
    pub in_progress: i64,
    pub on_hold: i64,
    pub cancel: i64,
    pub completed: i64,
}

impl ProjectCountByStatus {
    /// (status, 件数) の組から集計する。未知のステータスはどの件数にも含めない。
    pub fn from_counts(counts: &[(i16, i64)]) -> Self {
        let mut out = Self::default();
        for &(status, total) in counts {
            let Some(status) = ProjectStatus::from_code(status) else {
                continue;
            };
            out.all += total;
            match status {
                ProjectStatus::Open => out.open += total,
                ProjectStatus::InProgress => out.in_progress += total,
                ProjectStatus::OnHold => out.on_hold += total,
                ProjectStatus::Cancelled => out.cancel += total,
                ProjectStatus::Completed => out.completed += total,
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: i16,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub tasks: i64,
    pub defects: i64,
    pub incidents: i64,
}

/// 1 月から 12 月までをゼロで埋めた月別ヒストグラムを返す。
pub fn empty_histogram() -> BTreeMap<u32, MonthlyCount> {
    (1..=12).map(|month| (month, MonthlyCount::default())).collect()
}

/// DashboardSnapshot はダッシュボード 1 回分の集計結果。永続化しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub total_projects: i64,
    pub pending_tasks: i64,
    pub pending_defects: i64,
    pub pending_incidents: i64,
    pub project_count_by_status: ProjectCountByStatus,
    pub task_count_by_status: Vec<StatusCount>,
    pub count_by_month: BTreeMap<u32, MonthlyCount>,
    pub projects: Vec<ProjectWithMembers>,
    pub tasks: Vec<WorkItemWithAssignee>,
    pub defects: Vec<WorkItemWithAssignee>,
    pub incidents: Vec<WorkItemWithAssignee>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_counts_fill_every_bucket() {
        let counts = ProjectCountByStatus::from_counts(&[(1, 3), (5, 2), (9, 1)]);
        assert_eq!(counts.all, 5);
        assert_eq!(counts.open, 3);
        assert_eq!(counts.completed, 2);
        assert_eq!(counts.in_progress, 0);
        assert_eq!(counts.on_hold, 0);
        assert_eq!(counts.cancel, 0);
    }

    #[test]
    fn histogram_has_twelve_zeroed_months() {
        let hist = empty_histogram();
        assert_eq!(hist.len(), 12);
        assert!(hist.values().all(|m| *m == MonthlyCount::default()));
        assert_eq!(hist.keys().next(), Some(&1));
        assert_eq!(hist.keys().last(), Some(&12));
    }
}
