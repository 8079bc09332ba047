use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Datelike;
use tokio::sync::RwLock;

use crate::domain::entity::dashboard::StatusCount;
use crate::domain::entity::email_template::EmailTemplate;
use crate::domain::entity::project::{Project, ProjectWithMembers};
use crate::domain::entity::user::User;
use crate::domain::entity::work_item::{WorkItem, WorkItemWithAssignee};
use crate::domain::repository::{
    DashboardRepository, EmailTemplateRepository, ProjectRepository, SettingRepository,
    UserRepository, WorkItemRepository,
};
use crate::domain::value_object::{ProjectScope, TemplateType, WorkItemKind, WorkItemScope};

#[derive(Default)]
struct StoreData {
    users: BTreeMap<i64, User>,
    templates: HashMap<TemplateType, EmailTemplate>,
    projects: BTreeMap<i64, Project>,
    /// (project_id, user_id, edit)
    project_members: Vec<(i64, i64, bool)>,
    work_items: Vec<WorkItem>,
    /// (kind, item_id, user_id)
    work_item_members: Vec<(WorkItemKind, i64, i64)>,
    announcement_notification: bool,
}

impl StoreData {
    fn project_in_scope(&self, project: &Project, scope: ProjectScope) -> bool {
        match scope {
            ProjectScope::Unscoped => true,
            ProjectScope::ClientOf(user_id) => project.client_id == Some(user_id),
            ProjectScope::EditableBy(user_id) => self
                .project_members
                .iter()
                .any(|&(pid, uid, edit)| pid == project.id && uid == user_id && edit),
        }
    }

    fn items_in_scope(
        &self,
        kind: WorkItemKind,
        scope: WorkItemScope,
    ) -> impl Iterator<Item = &WorkItem> + '_ {
        self.work_items.iter().filter(move |item| {
            item.kind == kind
                && match scope {
                    WorkItemScope::Unscoped => true,
                    WorkItemScope::AssignedTo(user_id) => item.assignee_id == Some(user_id),
                }
        })
    }

    fn pending_for(&self, kind: WorkItemKind, user_id: i64) -> impl Iterator<Item = &WorkItem> + '_ {
        self.work_items
            .iter()
            .filter(move |item| item.kind == kind && item.involves(user_id) && item.is_pending())
    }
}

/// InMemoryStore はデータベース未設定時に使うインメモリの永続化層。全リポジトリトレイトを実装する。
#[derive(Default)]
pub struct InMemoryStore {
    data: RwLock<StoreData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.data.write().await.users.insert(user.id, user);
    }

    pub async fn insert_template(&self, template: EmailTemplate) {
        self.data
            .write()
            .await
            .templates
            .insert(template.template_type, template);
    }

    pub async fn insert_project(&self, project: Project) {
        self.data.write().await.projects.insert(project.id, project);
    }

    pub async fn add_project_member(&self, project_id: i64, user_id: i64, edit: bool) {
        self.data
            .write()
            .await
            .project_members
            .push((project_id, user_id, edit));
    }

    pub async fn insert_work_item(&self, item: WorkItem) {
        let mut data = self.data.write().await;
        data.work_items
            .retain(|existing| !(existing.kind == item.kind && existing.id == item.id));
        data.work_items.push(item);
    }

    pub async fn add_work_item_member(&self, kind: WorkItemKind, item_id: i64, user_id: i64) {
        self.data
            .write()
            .await
            .work_item_members
            .push((kind, item_id, user_id));
    }

    pub async fn set_announcement_notification(&self, enabled: bool) {
        self.data.write().await.announcement_notification = enabled;
    }
}

fn take(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.data.read().await.users.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> anyhow::Result<Vec<User>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .values()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EmailTemplateRepository for InMemoryStore {
    async fn find_by_type(&self, template_type: TemplateType) -> anyhow::Result<Option<EmailTemplate>> {
        Ok(self.data.read().await.templates.get(&template_type).cloned())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<EmailTemplate>> {
        let mut templates: Vec<EmailTemplate> =
            self.data.read().await.templates.values().cloned().collect();
        templates.sort_by_key(|t| t.id);
        Ok(templates)
    }

    async fn update(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        let mut data = self.data.write().await;
        if let Some(existing) = data.templates.get_mut(&template.template_type) {
            *existing = template.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Project>> {
        Ok(self.data.read().await.projects.get(&id).cloned())
    }

    async fn find_editors(&self, project_id: i64) -> anyhow::Result<Vec<User>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .values()
            .filter(|u| {
                data.project_members
                    .iter()
                    .any(|&(pid, uid, edit)| pid == project_id && uid == u.id && edit)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkItemRepository for InMemoryStore {
    async fn find_by_id(&self, kind: WorkItemKind, id: i64) -> anyhow::Result<Option<WorkItem>> {
        let data = self.data.read().await;
        Ok(data
            .work_items
            .iter()
            .find(|item| item.kind == kind && item.id == id)
            .cloned())
    }

    async fn find_members(&self, kind: WorkItemKind, id: i64) -> anyhow::Result<Vec<User>> {
        let data = self.data.read().await;
        Ok(data
            .users
            .values()
            .filter(|u| {
                data.work_item_members
                    .iter()
                    .any(|&(k, item_id, uid)| k == kind && item_id == id && uid == u.id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SettingRepository for InMemoryStore {
    async fn announcement_notification_enabled(&self) -> anyhow::Result<bool> {
        Ok(self.data.read().await.announcement_notification)
    }
}

#[async_trait]
impl DashboardRepository for InMemoryStore {
    async fn count_active_projects(&self, scope: ProjectScope) -> anyhow::Result<i64> {
        let data = self.data.read().await;
        let count = data
            .projects
            .values()
            .filter(|p| p.is_active() && data.project_in_scope(p, scope))
            .count();
        Ok(i64::try_from(count)?)
    }

    async fn project_status_counts(&self, scope: ProjectScope) -> anyhow::Result<Vec<(i16, i64)>> {
        let data = self.data.read().await;
        let mut counts: BTreeMap<i16, i64> = BTreeMap::new();
        for project in data.projects.values() {
            if data.project_in_scope(project, scope) {
                *counts.entry(project.status).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn recent_projects(
        &self,
        scope: ProjectScope,
        limit: i64,
    ) -> anyhow::Result<Vec<ProjectWithMembers>> {
        let data = self.data.read().await;
        let mut projects: Vec<&Project> = data
            .projects
            .values()
            .filter(|p| p.is_active() && data.project_in_scope(p, scope))
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(projects
            .into_iter()
            .take(take(limit))
            .map(|project| ProjectWithMembers {
                project: project.clone(),
                users: data
                    .users
                    .values()
                    .filter(|u| {
                        data.project_members
                            .iter()
                            .any(|&(pid, uid, edit)| pid == project.id && uid == u.id && edit)
                    })
                    .map(User::summary)
                    .collect(),
            })
            .collect())
    }

    async fn count_pending(&self, kind: WorkItemKind, user_id: i64) -> anyhow::Result<i64> {
        let data = self.data.read().await;
        Ok(i64::try_from(data.pending_for(kind, user_id).count())?)
    }

    async fn status_counts(
        &self,
        kind: WorkItemKind,
        scope: WorkItemScope,
    ) -> anyhow::Result<Vec<StatusCount>> {
        let data = self.data.read().await;
        let mut counts: BTreeMap<i16, i64> = BTreeMap::new();
        for item in data.items_in_scope(kind, scope) {
            *counts.entry(item.status).or_default() += 1;
        }
        Ok(counts
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
        let data = self.data.read().await;
        let mut counts: BTreeMap<u32, i64> = BTreeMap::new();
        for date in data
            .items_in_scope(kind, scope)
            .filter_map(|item| item.start_date)
            .filter(|date| date.year() == year)
        {
            *counts.entry(date.month()).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn recent_pending_items(
        &self,
        kind: WorkItemKind,
        user_id: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<WorkItemWithAssignee>> {
        let data = self.data.read().await;
        let mut items: Vec<&WorkItem> = data.pending_for(kind, user_id).collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(items
            .into_iter()
            .take(take(limit))
            .map(|item| WorkItemWithAssignee {
                item: item.clone(),
                assign_user: item
                    .assignee_id
                    .and_then(|id| data.users.get(&id))
                    .map(User::summary),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::value_object::ProjectStatus;

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        let mut client = User::new(9, "Carol", "Client", "carol@example.com");
        client.is_client = true;
        store.insert_user(client).await;
        store.insert_user(User::new(2, "Dev", "One", "dev@example.com")).await;

        for (id, status) in [
            (1, ProjectStatus::Open),
            (2, ProjectStatus::InProgress),
            (3, ProjectStatus::Completed),
        ] {
            let mut p = Project::new(id, &format!("P{id}"), status);
            p.client_id = Some(9);
            store.insert_project(p).await;
        }
        store.insert_project(Project::new(4, "Other", ProjectStatus::Open)).await;
        store.add_project_member(4, 2, true).await;
        store.add_project_member(1, 2, false).await;
        store
    }

    #[tokio::test]
    async fn client_counts_only_own_active_projects() {
        let store = seeded().await;
        assert_eq!(
            store.count_active_projects(ProjectScope::ClientOf(9)).await.unwrap(),
            2
        );
        assert_eq!(
            store.project_status_counts(ProjectScope::ClientOf(9)).await.unwrap(),
            vec![(1, 1), (2, 1), (5, 1)]
        );
    }

    #[tokio::test]
    async fn editor_scope_ignores_read_only_membership() {
        let store = seeded().await;
        let projects = store
            .recent_projects(ProjectScope::EditableBy(2), 10)
            .await
            .unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].project.id, 4);
        assert_eq!(projects[0].users[0].id, 2);
    }

    #[tokio::test]
    async fn pending_items_include_created_and_assigned() {
        let store = seeded().await;
        let mut assigned = WorkItem::new(1, WorkItemKind::Defect, "Crash", 1, 9);
        assigned.assignee_id = Some(2);
        let created = WorkItem::new(2, WorkItemKind::Defect, "Typo", 4, 2);
        let closed = WorkItem::new(3, WorkItemKind::Defect, "Old", 2, 2);
        for item in [assigned, created, closed] {
            store.insert_work_item(item).await;
        }

        assert_eq!(store.count_pending(WorkItemKind::Defect, 2).await.unwrap(), 2);
        let items = store
            .recent_pending_items(WorkItemKind::Defect, 2, 1)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn monthly_counts_filter_by_year_and_assignee() {
        let store = seeded().await;
        let dates = [(1, 2026, 1), (2, 2026, 1), (3, 2026, 7), (4, 2025, 7)];
        for (id, year, month) in dates {
            let mut item = WorkItem::new(id, WorkItemKind::Task, "t", 1, 9);
            item.assignee_id = Some(2);
            item.start_date = NaiveDate::from_ymd_opt(year, month, 15);
            store.insert_work_item(item).await;
        }

        let counts = store
            .monthly_counts(WorkItemKind::Task, WorkItemScope::AssignedTo(2), 2026)
            .await
            .unwrap();
        assert_eq!(counts, vec![(1, 2), (7, 1)]);
        let none = store
            .monthly_counts(WorkItemKind::Task, WorkItemScope::AssignedTo(9), 2026)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn update_ignores_unknown_template() {
        let store = InMemoryStore::new();
        let template = EmailTemplate::new(1, TemplateType::Meeting, "s", "b");
        store.update(&template).await.unwrap();
        assert!(store.find_by_type(TemplateType::Meeting).await.unwrap().is_none());
    }
}
