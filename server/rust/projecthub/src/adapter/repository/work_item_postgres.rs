use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use super::user_postgres::{UserRow, USER_COLUMNS};
use crate::domain::entity::user::{User, UserSummary};
use crate::domain::entity::work_item::{WorkItem, WorkItemWithAssignee};
use crate::domain::repository::WorkItemRepository;
use crate::domain::value_object::WorkItemKind;

/// ItemTable は作業項目の種別ごとのテーブル名・カラム名の対応を表す。
#[derive(Debug, Clone, Copy)]
pub(crate) struct ItemTable {
    pub table: &'static str,
    pub name: &'static str,
    pub assignee: &'static str,
    pub creator: &'static str,
    pub start_date: &'static str,
    pub members: &'static str,
    pub member_fk: &'static str,
}

impl ItemTable {
    pub(crate) fn of(kind: WorkItemKind) -> Self {
        match kind {
            WorkItemKind::Task => ItemTable {
                table: "projecthub.tasks",
                name: "name",
                assignee: "assign_to",
                creator: "created_by",
                start_date: "task_start_date",
                members: "projecthub.task_members",
                member_fk: "task_id",
            },
            WorkItemKind::Defect => ItemTable {
                table: "projecthub.defects",
                name: "defect_name",
                assignee: "assign_member",
                creator: "create_user_id",
                start_date: "start_date",
                members: "projecthub.defect_members",
                member_fk: "defect_id",
            },
            WorkItemKind::Incident => ItemTable {
                table: "projecthub.incidents",
                name: "incident_name",
                assignee: "assign_to",
                creator: "create_user_id",
                start_date: "start_date",
                members: "projecthub.incident_members",
                member_fk: "incident_id",
            },
        }
    }

    /// 共通の行形式に揃えた SELECT 句。作業項目を w、担当者を a で結合する前提。
    pub(crate) fn select_columns(&self) -> String {
        format!(
            "w.id, w.{name} AS name, w.project_id, w.status, w.{assignee} AS assignee_id, \
             w.{creator} AS creator_id, w.{start} AS start_date, w.created_at, \
             a.firstname AS assignee_firstname, a.lastname AS assignee_lastname, \
             a.avatar AS assignee_avatar",
            name = self.name,
            assignee = self.assignee,
            creator = self.creator,
            start = self.start_date,
        )
    }

    pub(crate) fn from_clause(&self) -> String {
        format!(
            "{table} w LEFT JOIN projecthub.users a ON a.id = w.{assignee}",
            table = self.table,
            assignee = self.assignee,
        )
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct WorkItemRow {
    id: i64,
    name: String,
    project_id: Option<i64>,
    status: i16,
    assignee_id: Option<i64>,
    creator_id: i64,
    start_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    assignee_firstname: Option<String>,
    assignee_lastname: Option<String>,
    assignee_avatar: Option<String>,
}

impl WorkItemRow {
    pub(crate) fn into_item(self, kind: WorkItemKind) -> WorkItemWithAssignee {
        let assign_user = match (self.assignee_id, self.assignee_firstname) {
            (Some(id), Some(firstname)) => Some(UserSummary {
                id,
                firstname,
                lastname: self.assignee_lastname.unwrap_or_default(),
                avatar: self.assignee_avatar,
            }),
            _ => None,
        };
        WorkItemWithAssignee {
            item: WorkItem {
                id: self.id,
                kind,
                name: self.name,
                project_id: self.project_id,
                status: self.status,
                assignee_id: self.assignee_id,
                creator_id: self.creator_id,
                start_date: self.start_date,
                created_at: self.created_at,
            },
            assign_user,
        }
    }
}

pub struct WorkItemPostgresRepository {
    pool: Arc<PgPool>,
}

impl WorkItemPostgresRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkItemRepository for WorkItemPostgresRepository {
    async fn find_by_id(&self, kind: WorkItemKind, id: i64) -> anyhow::Result<Option<WorkItem>> {
        let t = ItemTable::of(kind);
        let sql = format!(
            "SELECT {} FROM {} WHERE w.id = $1",
            t.select_columns(),
            t.from_clause()
        );
        let row: Option<WorkItemRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(row.map(|r| r.into_item(kind).item))
    }

    async fn find_members(&self, kind: WorkItemKind, id: i64) -> anyhow::Result<Vec<User>> {
        let t = ItemTable::of(kind);
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM {members} m \
             JOIN projecthub.users u ON u.id = m.user_id \
             WHERE m.{fk} = $1 ORDER BY u.id",
            members = t.members,
            fk = t.member_fk,
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
