use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserSummary;
use crate::domain::value_object::WorkItemKind;

/// WorkItem はタスク・不具合・インシデントを共通の形で表す。
/// 種別固有のカラム名の違いはリポジトリ実装側で吸収する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: i64,
    pub kind: WorkItemKind,
    pub name: String,
    pub project_id: Option<i64>,
    pub status: i16,
    pub assignee_id: Option<i64>,
    pub creator_id: i64,
    pub start_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl WorkItem {
    pub fn new(id: i64, kind: WorkItemKind, name: &str, status: i16, creator_id: i64) -> Self {
        Self {
            id,
            kind,
            name: name.to_string(),
            project_id: None,
            status,
            assignee_id: None,
            creator_id,
            start_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.kind.is_terminal(self.status)
    }

    /// 担当者または作成者として関与していれば true。
    pub fn involves(&self, user_id: i64) -> bool {
        self.assignee_id == Some(user_id) || self.creator_id == user_id
    }
}

/// WorkItemWithAssignee はダッシュボード一覧用に担当者情報を同梱した作業項目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItemWithAssignee {
    #[serde(flatten)]
    pub item: WorkItem,
    pub assign_user: Option<UserSummary>,
}
