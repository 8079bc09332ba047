use std::sync::Arc;

use serde::Deserialize;

use crate::domain::entity::notification::{DispatchOutcome, Recipient};
use crate::domain::entity::user::User;
use crate::domain::repository::{ProjectRepository, UserRepository, WorkItemRepository};
use crate::domain::service::Substitutions;
use crate::domain::value_object::{SiteConfig, TemplateType, WorkItemKind};
use crate::usecase::notify::{Envelope, NotifyUseCase};

/// ActivityEvent はプロジェクト・作業項目で発生した通知対象の出来事。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ActivityEvent {
    ProjectAssigned {
        project_id: i64,
        project_name: String,
        user_ids: Vec<i64>,
        subject: String,
    },
    ProjectCreated {
        project_id: i64,
        project_name: String,
        client_id: i64,
    },
    ProjectCompleted {
        project_id: i64,
    },
    ProjectCommented {
        project_id: i64,
        comment: String,
    },
    ProjectAttachmentAdded {
        project_id: i64,
    },
    WorkItemAssigned {
        kind: WorkItemKind,
        item_id: i64,
        user_ids: Vec<i64>,
        subject: String,
    },
    WorkItemStatusChanged {
        kind: WorkItemKind,
        item_id: i64,
    },
    WorkItemCommented {
        kind: WorkItemKind,
        item_id: i64,
        comment: String,
    },
    WorkItemAttachmentAdded {
        kind: WorkItemKind,
        item_id: i64,
    },
}

impl ActivityEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ActivityEvent::ProjectAssigned { .. } => "project_assigned",
            ActivityEvent::ProjectCreated { .. } => "project_created",
            ActivityEvent::ProjectCompleted { .. } => "project_completed",
            ActivityEvent::ProjectCommented { .. } => "project_commented",
            ActivityEvent::ProjectAttachmentAdded { .. } => "project_attachment_added",
            ActivityEvent::WorkItemAssigned { .. } => "work_item_assigned",
            ActivityEvent::WorkItemStatusChanged { .. } => "work_item_status_changed",
            ActivityEvent::WorkItemCommented { .. } => "work_item_commented",
            ActivityEvent::WorkItemAttachmentAdded { .. } => "work_item_attachment_added",
        }
    }
}

/// SendActivityNotificationUseCase はアクティビティ通知の宛先と置換表を組み立てて遅延送信する。
/// 呼び出し元の操作は常に成功扱いとし、ここでの失敗はログに残すだけにする。
pub struct SendActivityNotificationUseCase {
    notify: Arc<NotifyUseCase>,
    user_repo: Arc<dyn UserRepository>,
    project_repo: Arc<dyn ProjectRepository>,
    work_item_repo: Arc<dyn WorkItemRepository>,
    site: SiteConfig,
}

type Plan = (TemplateType, Vec<Envelope>);

impl SendActivityNotificationUseCase {
    pub fn new(
        notify: Arc<NotifyUseCase>,
        user_repo: Arc<dyn UserRepository>,
        project_repo: Arc<dyn ProjectRepository>,
        work_item_repo: Arc<dyn WorkItemRepository>,
        site: SiteConfig,
    ) -> Self {
        Self {
            notify,
            user_repo,
            project_repo,
            work_item_repo,
            site,
        }
    }

    pub async fn execute(&self, actor: &User, event: &ActivityEvent) -> Vec<DispatchOutcome> {
        match self.plan(actor, event).await {
            Ok(Some((template_type, envelopes))) => {
                self.notify.execute(template_type, envelopes).await
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    event = event.name(),
                    actor_id = actor.id,
                    error = %e,
                    "failed to resolve activity notification; nothing sent"
                );
                Vec::new()
            }
        }
    }

    async fn plan(&self, actor: &User, event: &ActivityEvent) -> anyhow::Result<Option<Plan>> {
        match event {
            ActivityEvent::ProjectAssigned {
                project_id,
                project_name,
                user_ids,
                subject,
            } => {
                let url = self.site.detail_url("projects", *project_id);
                let assigned_by = actor.full_name();
                let envelopes = self
                    .user_repo
                    .find_by_ids(user_ids)
                    .await?
                    .iter()
                    .map(|user| {
                        let subs = Substitutions::new()
                            .with("{SITE_NAME}", self.site.company_name.as_str())
                            .with("{PROJECT_NAME}", project_name.as_str())
                            .with("{ASSIGNED_BY}", assigned_by.as_str())
                            .with("{PROJECT_URL}", url.as_str());
                        Envelope::new(Recipient::from_user(user), subs).with_subject(subject.as_str())
                    })
                    .collect();
                Ok(Some((TemplateType::AssignedProject, envelopes)))
            }
            ActivityEvent::ProjectCreated {
                project_id,
                project_name,
                client_id,
            } => {
                let Some(client) = self.user_repo.find_by_id(*client_id).await? else {
                    tracing::debug!(client_id, "client not found; project notification skipped");
                    return Ok(None);
                };
                Ok(Some((
                    TemplateType::NotificationClient,
                    vec![self.client_envelope(&client, project_name, *project_id)],
                )))
            }
            ActivityEvent::ProjectCompleted { project_id } => {
                let Some(project) = self.project_repo.find_by_id(*project_id).await? else {
                    return Ok(None);
                };
                let Some(client_id) = project.client_id else {
                    return Ok(None);
                };
                let Some(client) = self.user_repo.find_by_id(client_id).await? else {
                    return Ok(None);
                };
                Ok(Some((
                    TemplateType::CompleteProjects,
                    vec![self.client_envelope(&client, &project.project_name, project.id)],
                )))
            }
            ActivityEvent::ProjectCommented {
                project_id,
                comment,
            } => {
                let Some(project) = self.project_repo.find_by_id(*project_id).await? else {
                    return Ok(None);
                };
                let url = self.site.detail_url("projects", project.id);
                let posted_by = actor.full_name();
                let envelopes = self
                    .project_repo
                    .find_editors(project.id)
                    .await?
                    .iter()
                    .map(|user| {
                        let subs = Substitutions::new()
                            .with("{POSTED_BY}", posted_by.as_str())
                            .with("{PROJECT_NAME}", project.project_name.as_str())
                            .with("{COMMENT_URL}", url.as_str())
                            .with("{COMMENT_MESSAGE}", comment.as_str())
                            .with("{SITE_NAME}", self.site.company_name.as_str());
                        Envelope::new(Recipient::from_user(user), subs)
                    })
                    .collect();
                Ok(Some((TemplateType::ProjectComments, envelopes)))
            }
            ActivityEvent::ProjectAttachmentAdded { project_id } => {
                let Some(project) = self.project_repo.find_by_id(*project_id).await? else {
                    return Ok(None);
                };
                let url = self.site.detail_url("projects", project.id);
                let uploaded_by = actor.full_name();
                let envelopes = self
                    .project_repo
                    .find_editors(project.id)
                    .await?
                    .iter()
                    .map(|user| {
                        let subs = Substitutions::new()
                            .with("{UPLOADED_BY}", uploaded_by.as_str())
                            .with("{PROJECT_NAME}", project.project_name.as_str())
                            .with("{PROJECT_URL}", url.as_str())
                            .with("{SITE_NAME}", self.site.company_name.as_str());
                        Envelope::new(Recipient::from_user(user), subs)
                    })
                    .collect();
                Ok(Some((TemplateType::ProjectAttachment, envelopes)))
            }
            ActivityEvent::WorkItemAssigned {
                kind,
                item_id,
                user_ids,
                subject,
            } => {
                let Some(item) = self.work_item_repo.find_by_id(*kind, *item_id).await? else {
                    return Ok(None);
                };
                let assignee = match item.assignee_id {
                    Some(id) => self.user_repo.find_by_id(id).await?,
                    None => None,
                };
                let Some(assignee) = assignee else {
                    tracing::warn!(
                        kind = %kind,
                        item_id,
                        "assignee could not be resolved; assignment notification skipped"
                    );
                    return Ok(None);
                };
                let url = self.site.detail_url(kind.detail_area(), item.id);
                let assigned_to = assignee.full_name();
                let assigned_by = actor.full_name();
                let envelopes = self
                    .user_repo
                    .find_by_ids(user_ids)
                    .await?
                    .iter()
                    .map(|user| {
                        let subs = Substitutions::new()
                            .with("{SITE_NAME}", self.site.company_name.as_str())
                            .with(kind.title_token(), item.name.as_str())
                            .with("{ASSIGNED_TO}", assigned_to.as_str())
                            .with("{ASSIGNED_BY}", assigned_by.as_str())
                            .with(kind.url_token(), url.as_str());
                        Envelope::new(Recipient::from_user(user), subs).with_subject(subject.as_str())
                    })
                    .collect();
                Ok(Some((TemplateType::assigned(*kind), envelopes)))
            }
            ActivityEvent::WorkItemStatusChanged { kind, item_id } => {
                let Some(item) = self.work_item_repo.find_by_id(*kind, *item_id).await? else {
                    return Ok(None);
                };
                let url = self.site.detail_url(kind.detail_area(), item.id);
                let changed_by = upper_first(&actor.full_name());
                let status = kind
                    .status_label(item.status)
                    .map_or_else(|| item.status.to_string(), str::to_string);
                let envelopes = self
                    .work_item_repo
                    .find_members(*kind, item.id)
                    .await?
                    .iter()
                    .map(|user| {
                        let subs = match kind {
                            WorkItemKind::Task => Substitutions::new()
                                .with("{TASK_NAME}", item.name.as_str())
                                .with("{ASSIGNED_BY}", changed_by.as_str())
                                .with("{TASK_URL}", url.as_str())
                                .with("{SITE_NAME}", self.site.company_name.as_str()),
                            WorkItemKind::Defect | WorkItemKind::Incident => Substitutions::new()
                                .with(kind.title_token(), item.name.as_str())
                                .with("{STATUS}", status.as_str())
                                .with("{MARKED_BY}", changed_by.as_str())
                                .with(kind.url_token(), url.as_str())
                                .with("{SITE_NAME}", self.site.company_name.as_str()),
                        };
                        Envelope::new(Recipient::from_user(user), subs)
                    })
                    .collect();
                Ok(Some((TemplateType::updated(*kind), envelopes)))
            }
            ActivityEvent::WorkItemCommented {
                kind,
                item_id,
                comment,
            } => {
                let Some(item) = self.work_item_repo.find_by_id(*kind, *item_id).await? else {
                    return Ok(None);
                };
                let url = self.site.detail_url(kind.detail_area(), item.id);
                let posted_by = actor.full_name();
                let envelopes = self
                    .work_item_repo
                    .find_members(*kind, item.id)
                    .await?
                    .iter()
                    .map(|user| {
                        let subs = Substitutions::new()
                            .with("{POSTED_BY}", posted_by.as_str())
                            .with(kind.title_token(), item.name.as_str())
                            .with("{COMMENT_URL}", url.as_str())
                            .with("{COMMENT_MESSAGE}", comment.as_str())
                            .with("{SITE_NAME}", self.site.company_name.as_str());
                        Envelope::new(Recipient::from_user(user), subs)
                    })
                    .collect();
                Ok(Some((TemplateType::comments(*kind), envelopes)))
            }
            ActivityEvent::WorkItemAttachmentAdded { kind, item_id } => {
                let Some(item) = self.work_item_repo.find_by_id(*kind, *item_id).await? else {
                    return Ok(None);
                };
                let url = self.site.detail_url(kind.detail_area(), item.id);
                let uploaded_by = actor.full_name();
                let envelopes = self
                    .work_item_repo
                    .find_members(*kind, item.id)
                    .await?
                    .iter()
                    .map(|user| {
                        let subs = Substitutions::new()
                            .with("{UPLOADED_BY}", uploaded_by.as_str())
                            .with(kind.title_token(), item.name.as_str())
                            .with(kind.url_token(), url.as_str())
                            .with("{SITE_NAME}", self.site.company_name.as_str());
                        Envelope::new(Recipient::from_user(user), subs)
                    })
                    .collect();
                Ok(Some((TemplateType::attachment(*kind), envelopes)))
            }
        }
    }

    fn client_envelope(&self, client: &User, project_name: &str, project_id: i64) -> Envelope {
        let client_name = client.full_name();
        let subs = Substitutions::new()
            .with("{SITE_NAME}", self.site.company_name.as_str())
            .with("{PROJECT_NAME}", project_name)
            .with("{CLIENT_NAME}", client_name.as_str())
            .with("{PROJECT_LINK}", self.site.detail_url("projects", project_id));
        Envelope::new(Recipient::new(&client.email, &client_name), subs)
    }
}

/// 先頭の 1 文字だけを大文字にする。
fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::email_template::EmailTemplate;
    use crate::domain::entity::project::Project;
    use crate::domain::entity::work_item::WorkItem;
    use crate::domain::repository::email_template_repository::MockEmailTemplateRepository;
    use crate::domain::repository::project_repository::MockProjectRepository;
    use crate::domain::repository::user_repository::MockUserRepository;
    use crate::domain::repository::work_item_repository::MockWorkItemRepository;
    use crate::domain::service::job_queue::MockJobQueue;
    use crate::domain::service::mail_transport::MockMailTransport;
    use crate::domain::value_object::ProjectStatus;
    use crate::infrastructure::metrics::Metrics;
    use crate::usecase::dispatcher::Dispatcher;

    fn site() -> SiteConfig {
        SiteConfig {
            company_name: "Acme".to_string(),
            app_url: "https://api.example.com".to_string(),
            front_url: "https://app.example.com".to_string(),
            activation_expire_secs: 3600,
        }
    }

    fn actor() -> User {
        User::new(1, "alan", "turing", "alan@example.com")
    }

    fn member(id: i64) -> User {
        User::new(id, "Member", &id.to_string(), &format!("m{id}@example.com"))
    }

    struct Repos {
        users: MockUserRepository,
        projects: MockProjectRepository,
        items: MockWorkItemRepository,
    }

    impl Repos {
        fn new() -> Self {
            Self {
                users: MockUserRepository::new(),
                projects: MockProjectRepository::new(),
                items: MockWorkItemRepository::new(),
            }
        }
    }

    fn build(template_body: &str, repos: Repos, queue: MockJobQueue) -> SendActivityNotificationUseCase {
        build_with(None, template_body, repos, queue)
    }

    /// expected を指定すると、その種別以外のテンプレート読み込みで失敗する。
    fn build_with(
        expected: Option<TemplateType>,
        template_body: &str,
        repos: Repos,
        queue: MockJobQueue,
    ) -> SendActivityNotificationUseCase {
        let body = template_body.to_string();
        let mut templates = MockEmailTemplateRepository::new();
        templates
            .expect_find_by_type()
            .withf(move |t| expected.is_none_or(|e| e == *t))
            .returning(move |t| Ok(Some(EmailTemplate::new(1, t, "{SITE_NAME} update", &body))));
        let metrics = Arc::new(Metrics::new("projecthub-test").unwrap());
        let dispatcher = Dispatcher::new(Arc::new(MockMailTransport::new()), Arc::new(queue), metrics);
        let notify = Arc::new(NotifyUseCase::new(Arc::new(templates), Arc::new(dispatcher)));
        SendActivityNotificationUseCase::new(
            notify,
            Arc::new(repos.users),
            Arc::new(repos.projects),
            Arc::new(repos.items),
            site(),
        )
    }

    #[test]
    fn upper_first_only_touches_first_char() {
        assert_eq!(upper_first("alan turing"), "Alan turing");
        assert_eq!(upper_first(""), "");
        assert_eq!(upper_first("élan"), "Élan");
    }

    #[test]
    fn event_deserializes_from_tagged_json() {
        let event: ActivityEvent = serde_json::from_value(serde_json::json!({
            "event": "work_item_commented",
            "kind": "defect",
            "item_id": 9,
            "comment": "repro attached"
        }))
        .unwrap();
        assert_eq!(
            event,
            ActivityEvent::WorkItemCommented {
                kind: WorkItemKind::Defect,
                item_id: 9,
                comment: "repro attached".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn defect_status_change_uses_label_and_capitalized_actor() {
        let mut repos = Repos::new();
        repos.items.expect_find_by_id().returning(|kind, id| {
            let mut item = WorkItem::new(id, kind, "Login crash", 5, 1);
            item.assignee_id = Some(2);
            Ok(Some(item))
        });
        repos
            .items
            .expect_find_members()
            .returning(|_, _| Ok(vec![member(2), member(3)]));
        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| {
                job.subject == "Acme update"
                    && job.body
                        == "Login crash is Solved by Alan turing: https://app.example.com/#/defects/detail/7"
            })
            .times(2)
            .returning(|_| Ok(()));

        let uc = build("{DEFECT_TITLE} is {STATUS} by {MARKED_BY}: {DEFECT_URL}", repos, queue);
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::WorkItemStatusChanged {
                    kind: WorkItemKind::Defect,
                    item_id: 7,
                },
            )
            .await;
        assert_eq!(outcomes, vec![DispatchOutcome::Queued, DispatchOutcome::Queued]);
    }

    #[tokio::test]
    async fn task_status_change_uses_assigned_by_token() {
        let mut repos = Repos::new();
        repos
            .items
            .expect_find_by_id()
            .returning(|kind, id| Ok(Some(WorkItem::new(id, kind, "Write docs", 6, 1))));
        repos
            .items
            .expect_find_members()
            .returning(|_, _| Ok(vec![member(2)]));
        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| job.body == "Write docs by Alan turing {STATUS}")
            .times(1)
            .returning(|_| Ok(()));

        // task_updated は {STATUS} を置換しない
        let uc = build("{TASK_NAME} by {ASSIGNED_BY} {STATUS}", repos, queue);
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::WorkItemStatusChanged {
                    kind: WorkItemKind::Task,
                    item_id: 4,
                },
            )
            .await;
        assert_eq!(outcomes, vec![DispatchOutcome::Queued]);
    }

    #[tokio::test]
    async fn assignment_without_resolvable_assignee_is_skipped() {
        let mut repos = Repos::new();
        repos
            .items
            .expect_find_by_id()
            .returning(|kind, id| Ok(Some(WorkItem::new(id, kind, "Outage", 1, 1))));
        repos.users.expect_find_by_ids().never();
        let mut queue = MockJobQueue::new();
        queue.expect_enqueue().never();

        let uc = build("{INCIDENT_TITLE}", repos, queue);
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::WorkItemAssigned {
                    kind: WorkItemKind::Incident,
                    item_id: 3,
                    user_ids: vec![2],
                    subject: "Assigned".to_string(),
                },
            )
            .await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn assignment_names_assignee_and_uses_caller_subject() {
        let mut repos = Repos::new();
        repos.items.expect_find_by_id().returning(|kind, id| {
            let mut item = WorkItem::new(id, kind, "Outage", 1, 1);
            item.assignee_id = Some(2);
            Ok(Some(item))
        });
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(member(id))));
        repos
            .users
            .expect_find_by_ids()
            .returning(|ids| Ok(ids.iter().copied().map(member).collect()));
        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| {
                job.subject == "Incident assigned to you"
                    && job.recipient_email == "m2@example.com"
                    && job.body == "Outage -> Member 2 (alan turing)"
            })
            .times(1)
            .returning(|_| Ok(()));

        let uc = build("{INCIDENT_TITLE} -> {ASSIGNED_TO} ({ASSIGNED_BY})", repos, queue);
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::WorkItemAssigned {
                    kind: WorkItemKind::Incident,
                    item_id: 3,
                    user_ids: vec![2],
                    subject: "Incident assigned to you".to_string(),
                },
            )
            .await;
        assert_eq!(outcomes, vec![DispatchOutcome::Queued]);
    }

    #[tokio::test]
    async fn project_comment_goes_to_editors() {
        let mut repos = Repos::new();
        repos
            .projects
            .expect_find_by_id()
            .returning(|id| Ok(Some(Project::new(id, "Apollo", ProjectStatus::InProgress))));
        repos
            .projects
            .expect_find_editors()
            .returning(|_| Ok(vec![member(5), member(6), member(7)]));
        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| {
                job.body == "alan turing on Apollo: LGTM https://app.example.com/#/projects/detail/11"
            })
            .times(3)
            .returning(|_| Ok(()));

        let uc = build("{POSTED_BY} on {PROJECT_NAME}: {COMMENT_MESSAGE} {COMMENT_URL}", repos, queue);
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::ProjectCommented {
                    project_id: 11,
                    comment: "LGTM".to_string(),
                },
            )
            .await;
        assert_eq!(outcomes.len(), 3);
    }

    #[tokio::test]
    async fn completed_project_without_client_is_noop() {
        let mut repos = Repos::new();
        repos
            .projects
            .expect_find_by_id()
            .returning(|id| Ok(Some(Project::new(id, "Apollo", ProjectStatus::Completed))));
        repos.users.expect_find_by_id().never();
        let mut queue = MockJobQueue::new();
        queue.expect_enqueue().never();

        let uc = build("{CLIENT_NAME}", repos, queue);
        let outcomes = uc
            .execute(&actor(), &ActivityEvent::ProjectCompleted { project_id: 11 })
            .await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn created_project_notifies_client() {
        let mut repos = Repos::new();
        repos.users.expect_find_by_id().returning(|id| {
            let mut client = member(id);
            client.is_client = true;
            Ok(Some(client))
        });
        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| {
                job.recipient_name == "Member 8"
                    && job.body == "Member 8: Apollo https://app.example.com/#/projects/detail/11"
            })
            .times(1)
            .returning(|_| Ok(()));

        let uc = build("{CLIENT_NAME}: {PROJECT_NAME} {PROJECT_LINK}", repos, queue);
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::ProjectCreated {
                    project_id: 11,
                    project_name: "Apollo".to_string(),
                    client_id: 8,
                },
            )
            .await;
        assert_eq!(outcomes, vec![DispatchOutcome::Queued]);
    }

    #[tokio::test]
    async fn repository_failure_is_swallowed() {
        let mut repos = Repos::new();
        repos
            .items
            .expect_find_by_id()
            .returning(|_, _| Err(anyhow::anyhow!("connection reset")));
        let mut queue = MockJobQueue::new();
        queue.expect_enqueue().never();

        let uc = build("{TASK_NAME}", repos, queue);
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::WorkItemAttachmentAdded {
                    kind: WorkItemKind::Task,
                    item_id: 1,
                },
            )
            .await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn project_assignment_renders_tokens_for_each_addressable_user() {
        let mut repos = Repos::new();
        repos.users.expect_find_by_ids().returning(|_| {
            Ok(vec![member(2), member(3), User::new(4, "No", "Mail", "")])
        });
        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| {
                job.subject == "You joined Apollo"
                    && job.body == "Acme|Apollo|alan turing|https://app.example.com/#/projects/detail/11"
            })
            .times(2)
            .returning(|_| Ok(()));

        let uc = build_with(
            Some(TemplateType::AssignedProject),
            "{SITE_NAME}|{PROJECT_NAME}|{ASSIGNED_BY}|{PROJECT_URL}",
            repos,
            queue,
        );
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::ProjectAssigned {
                    project_id: 11,
                    project_name: "Apollo".to_string(),
                    user_ids: vec![2, 3, 4],
                    subject: "You joined Apollo".to_string(),
                },
            )
            .await;
        assert_eq!(outcomes, vec![DispatchOutcome::Queued, DispatchOutcome::Queued]);
    }

    #[tokio::test]
    async fn project_attachment_links_project_url() {
        let mut repos = Repos::new();
        repos
            .projects
            .expect_find_by_id()
            .returning(|id| Ok(Some(Project::new(id, "Apollo", ProjectStatus::InProgress))));
        repos
            .projects
            .expect_find_editors()
            .returning(|_| Ok(vec![member(5)]));
        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| {
                job.subject == "Acme update"
                    && job.recipient_email == "m5@example.com"
                    && job.body
                        == "alan turing|Apollo|https://app.example.com/#/projects/detail/11|Acme|{COMMENT_URL}"
            })
            .times(1)
            .returning(|_| Ok(()));

        let uc = build_with(
            Some(TemplateType::ProjectAttachment),
            "{UPLOADED_BY}|{PROJECT_NAME}|{PROJECT_URL}|{SITE_NAME}|{COMMENT_URL}",
            repos,
            queue,
        );
        let outcomes = uc
            .execute(&actor(), &ActivityEvent::ProjectAttachmentAdded { project_id: 11 })
            .await;
        assert_eq!(outcomes, vec![DispatchOutcome::Queued]);
    }

    #[tokio::test]
    async fn work_item_comment_uses_comment_url_for_members() {
        let mut repos = Repos::new();
        repos
            .items
            .expect_find_by_id()
            .withf(|kind, id| *kind == WorkItemKind::Defect && *id == 9)
            .returning(|kind, id| Ok(Some(WorkItem::new(id, kind, "Login crash", 1, 1))));
        repos
            .items
            .expect_find_members()
            .returning(|_, _| Ok(vec![member(2), member(3)]));
        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| {
                job.body
                    == "alan turing|Login crash|https://app.example.com/#/defects/detail/9|repro attached|Acme|{DEFECT_URL}"
            })
            .times(2)
            .returning(|_| Ok(()));

        let uc = build_with(
            Some(TemplateType::comments(WorkItemKind::Defect)),
            "{POSTED_BY}|{DEFECT_TITLE}|{COMMENT_URL}|{COMMENT_MESSAGE}|{SITE_NAME}|{DEFECT_URL}",
            repos,
            queue,
        );
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::WorkItemCommented {
                    kind: WorkItemKind::Defect,
                    item_id: 9,
                    comment: "repro attached".to_string(),
                },
            )
            .await;
        assert_eq!(outcomes.len(), 2);
    }

    #[tokio::test]
    async fn work_item_attachment_uses_kind_url_token() {
        let mut repos = Repos::new();
        repos
            .items
            .expect_find_by_id()
            .returning(|kind, id| Ok(Some(WorkItem::new(id, kind, "Outage", 1, 1))));
        repos
            .items
            .expect_find_members()
            .withf(|kind, id| *kind == WorkItemKind::Incident && *id == 3)
            .returning(|_, _| Ok(vec![member(6)]));
        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| {
                job.recipient_email == "m6@example.com"
                    && job.body
                        == "alan turing|Outage|https://app.example.com/#/incidents/detail/3|Acme|{COMMENT_URL}"
            })
            .times(1)
            .returning(|_| Ok(()));

        let uc = build_with(
            Some(TemplateType::attachment(WorkItemKind::Incident)),
            "{UPLOADED_BY}|{INCIDENT_TITLE}|{INCIDENT_URL}|{SITE_NAME}|{COMMENT_URL}",
            repos,
            queue,
        );
        let outcomes = uc
            .execute(
                &actor(),
                &ActivityEvent::WorkItemAttachmentAdded {
                    kind: WorkItemKind::Incident,
                    item_id: 3,
                },
            )
            .await;
        assert_eq!(outcomes, vec![DispatchOutcome::Queued]);
    }
}
