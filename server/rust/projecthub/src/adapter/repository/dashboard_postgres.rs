use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use super::project_postgres::ProjectRow;
use super::work_item_postgres::{ItemTable, WorkItemRow};
use crate::domain::entity::dashboard::StatusCount;
use crate::domain::entity::project::ProjectWithMembers;
use crate::domain::entity::user::UserSummary;
use crate::domain::entity::work_item::WorkItemWithAssignee;
use crate::domain::repository::DashboardRepository;
use crate::domain::value_object::{ProjectScope, ProjectStatus, WorkItemKind, WorkItemScope};

pub struct DashboardPostgresRepository {
    pool: Arc<PgPool>,
}

impl DashboardPostgresRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// プロジェクトの可視範囲を WHERE 条件に変換する。`idx` はユーザー ID のバインド番号。
fn project_condition(scope: ProjectScope, idx: u32) -> Option<(String, i64)> {
    match scope {
        ProjectScope::Unscoped => None,
        ProjectScope::ClientOf(user_id) => Some((format!("p.client_id = ${idx}"), user_id)),
        ProjectScope::EditableBy(user_id) => Some((
            format!(
                "EXISTS (SELECT 1 FROM projecthub.project_members pm \
                 WHERE pm.project_id = p.id AND pm.user_id = ${idx} AND pm.edit)"
            ),
            user_id,
        )),
    }
}

fn work_item_condition(table: &ItemTable, scope: WorkItemScope, idx: u32) -> Option<(String, i64)> {
    match scope {
        WorkItemScope::Unscoped => None,
        WorkItemScope::AssignedTo(user_id) => {
            Some((format!("w.{} = ${idx}", table.assignee), user_id))
        }
    }
}

fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

fn personal_condition(table: &ItemTable) -> String {
    format!(
        "(w.{assignee} = $1 OR w.{creator} = $1) AND w.status <> ALL($2)",
        assignee = table.assignee,
        creator = table.creator,
    )
}

fn project_terminal_codes() -> Vec<i16> {
    ProjectStatus::TERMINAL_CODES.to_vec()
}

impl DashboardPostgresRepository {
    async fn members_of(&self, project_ids: &[i64]) -> anyhow::Result<HashMap<i64, Vec<UserSummary>>> {
        let rows: Vec<(i64, i64, String, String, Option<String>)> = sqlx::query_as(
            "SELECT pm.project_id, u.id, u.firstname, u.lastname, u.avatar \
             FROM projecthub.project_members pm \
             JOIN projecthub.users u ON u.id = pm.user_id \
             WHERE pm.edit AND pm.project_id = ANY($1) ORDER BY u.id",
        )
        .bind(project_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut members: HashMap<i64, Vec<UserSummary>> = HashMap::new();
        for (project_id, id, firstname, lastname, avatar) in rows {
            members.entry(project_id).or_default().push(UserSummary {
                id,
                firstname,
                lastname,
                avatar,
            });
        }
        Ok(members)
    }
}

#[async_trait]
impl DashboardRepository for DashboardPostgresRepository {
    async fn count_active_projects(&self, scope: ProjectScope) -> anyhow::Result<i64> {
        let mut conditions = vec!["p.status <> ALL($1)".to_string()];
        let scoped = project_condition(scope, 2);
        if let Some((cond, _)) = &scoped {
            conditions.push(cond.clone());
        }
        let sql = format!(
            "SELECT COUNT(*) FROM projecthub.projects p {}",
            where_clause(&conditions)
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(project_terminal_codes());
        if let Some((_, user_id)) = scoped {
            query = query.bind(user_id);
        }
        Ok(query.fetch_one(self.pool.as_ref()).await?)
    }

    async fn project_status_counts(&self, scope: ProjectScope) -> anyhow::Result<Vec<(i16, i64)>> {
        let scoped = project_condition(scope, 1);
        let conditions: Vec<String> = scoped.iter().map(|(c, _)| c.clone()).collect();
        let sql = format!(
            "SELECT p.status, COUNT(*) FROM projecthub.projects p {} GROUP BY p.status",
            where_clause(&conditions)
        );

        let mut query = sqlx::query_as::<_, (i16, i64)>(&sql);
        if let Some((_, user_id)) = scoped {
            query = query.bind(user_id);
        }
        Ok(query.fetch_all(self.pool.as_ref()).await?)
    }

    async fn recent_projects(
        &self,
        scope: ProjectScope,
        limit: i64,
    ) -> anyhow::Result<Vec<ProjectWithMembers>> {
        let mut conditions = vec!["p.status <> ALL($1)".to_string()];
        let mut bind_idx = 2u32;
        let scoped = project_condition(scope, bind_idx);
        if let Some((cond, _)) = &scoped {
            conditions.push(cond.clone());
            bind_idx += 1;
        }
        let sql = format!(
            "SELECT p.id, p.project_name, p.status, p.client_id, p.created_at \
             FROM projecthub.projects p {} ORDER BY p.created_at DESC, p.id DESC LIMIT ${}",
            where_clause(&conditions),
            bind_idx
        );

        let mut query = sqlx::query_as::<_, ProjectRow>(&sql).bind(project_terminal_codes());
        if let Some((_, user_id)) = scoped {
            query = query.bind(user_id);
        }
        let rows = query.bind(limit).fetch_all(self.pool.as_ref()).await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut members = if ids.is_empty() {
            HashMap::new()
        } else {
            self.members_of(&ids).await?
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let users = members.remove(&row.id).unwrap_or_default();
                ProjectWithMembers {
                    project: row.into(),
                    users,
                }
            })
            .collect())
    }

    async fn count_pending(&self, kind: WorkItemKind, user_id: i64) -> anyhow::Result<i64> {
        let t = ItemTable::of(kind);
        let sql = format!(
            "SELECT COUNT(*) FROM {} w WHERE {}",
            t.table,
            personal_condition(&t)
        );
        let total = sqlx::query_scalar::<_, i64>(&sql)
            .bind(user_id)
            .bind(kind.terminal_statuses().to_vec())
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(total)
    }

    async fn status_counts(
        &self,
        kind: WorkItemKind,
        scope: WorkItemScope,
    ) -> anyhow::Result<Vec<StatusCount>> {
        let t = ItemTable::of(kind);
        let scoped = work_item_condition(&t, scope, 1);
        let conditions: Vec<String> = scoped.iter().map(|(c, _)| c.clone()).collect();
        let sql = format!(
            "SELECT w.status, COUNT(*) FROM {} w {} GROUP BY w.status ORDER BY w.status",
            t.table,
            where_clause(&conditions)
        );

        let mut query = sqlx::query_as::<_, (i16, i64)>(&sql);
        if let Some((_, user_id)) = scoped {
            query = query.bind(user_id);
        }
        let rows = query.fetch_all(self.pool.as_ref()).await?;
        Ok(rows
            .into_iter()
            .map(|(status, total)| StatusCount { status, total })
            .collect())
    }

    async fn monthly_counts(
        &self,
        kind: WorkItemKind,
        scope: WorkItemScope,
        year: i32,
    ) -> anyhow::Result<Vec<(u32, i64)>> {
        let t = ItemTable::of(kind);
        let mut conditions = vec![format!(
            "EXTRACT(YEAR FROM w.{})::INT4 = $1",
            t.start_date
        )];
        let scoped = work_item_condition(&t, scope, 2);
        if let Some((cond, _)) = &scoped {
            conditions.push(cond.clone());
        }
        let sql = format!(
            "SELECT EXTRACT(MONTH FROM w.{start})::INT4 AS month, COUNT(*) FROM {table} w {filter} \
             GROUP BY month ORDER BY month",
            start = t.start_date,
            table = t.table,
            filter = where_clause(&conditions),
        );

        let mut query = sqlx::query_as::<_, (i32, i64)>(&sql).bind(year);
        if let Some((_, user_id)) = scoped {
            query = query.bind(user_id);
        }
        let rows = query.fetch_all(self.pool.as_ref()).await?;
        Ok(rows
            .into_iter()
            .filter_map(|(month, total)| u32::try_from(month).ok().map(|m| (m, total)))
            .collect())
    }

    async fn recent_pending_items(
        &self,
        kind: WorkItemKind,
        user_id: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<WorkItemWithAssignee>> {
        let t = ItemTable::of(kind);
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY w.created_at DESC, w.id DESC LIMIT $3",
            t.select_columns(),
            t.from_clause(),
            personal_condition(&t)
        );
        let rows: Vec<WorkItemRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(kind.terminal_statuses().to_vec())
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(rows.into_iter().map(|r| r.into_item(kind)).collect())
    }
}
