use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserSummary;
use crate::domain::value_object::ProjectStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub project_name: String,
    pub status: i16,
    pub client_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(id: i64, project_name: &str, status: ProjectStatus) -> Self {
        Self {
            id,
            project_name: project_name.to_string(),
            status: status.code(),
            client_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        !ProjectStatus::is_terminal_code(self.status)
    }
}

/// ProjectWithMembers はダッシュボード一覧用に編集権限メンバーを同梱したプロジェクト。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectWithMembers {
    #[serde(flatten)]
    pub project: Project,
    pub users: Vec<UserSummary>,
}
