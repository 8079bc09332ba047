//! 通知ディスパッチの統合テスト（インメモリストア + 記録用トランスポート）

use std::sync::Arc;

use chrono::NaiveDate;

use k1s0_projecthub_server::adapter::repository::InMemoryStore;
use k1s0_projecthub_server::domain::entity::email_template::EmailTemplate;
use k1s0_projecthub_server::domain::entity::notification::DispatchOutcome;
use k1s0_projecthub_server::domain::entity::schedule::{Announcement, Meeting};
use k1s0_projecthub_server::domain::entity::user::User;
use k1s0_projecthub_server::domain::service::{JobQueue, MailTransport};
use k1s0_projecthub_server::domain::value_object::TemplateType;
use k1s0_projecthub_server::infrastructure::metrics::Metrics;
use k1s0_projecthub_server::test_support::{
    make_notify, test_site, FailingMailTransport, RecordingJobQueue, RecordingMailTransport,
};
use k1s0_projecthub_server::usecase::{SendAccountEmailUseCase, SendScheduleNotificationUseCase};

fn metrics() -> Arc<Metrics> {
    Arc::new(Metrics::new("k1s0-projecthub-server-test").unwrap())
}

fn account_uc(
    store: Arc<InMemoryStore>,
    mailer: Arc<dyn MailTransport>,
    metrics: Arc<Metrics>,
) -> SendAccountEmailUseCase {
    let notify = make_notify(store, mailer, Arc::new(RecordingJobQueue::new()), metrics);
    SendAccountEmailUseCase::new(notify, test_site())
}

fn schedule_uc(
    store: Arc<InMemoryStore>,
    mailer: Arc<dyn MailTransport>,
    queue: Arc<dyn JobQueue>,
) -> SendScheduleNotificationUseCase {
    let notify = make_notify(store.clone(), mailer, queue, metrics());
    SendScheduleNotificationUseCase::new(notify, store.clone(), store, test_site())
}

fn at(hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 9)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn test_one_dispatch_per_recipient_with_address() {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_user(User::new(1, "Ann", "Lee", "ann@example.com"))
        .await;
    store.insert_user(User::new(2, "No", "Address", "  ")).await;
    store
        .insert_user(User::new(3, "Bob", "Ray", "bob@example.com"))
        .await;
    store
        .insert_template(EmailTemplate::new(
            1,
            TemplateType::Meeting,
            "unused",
            "Hello {NAME}, see you at {LOCATION}",
        ))
        .await;
    let queue = Arc::new(RecordingJobQueue::new());
    let uc = schedule_uc(store, Arc::new(RecordingMailTransport::new()), queue.clone());

    let meeting = Meeting {
        title: "Kickoff".to_string(),
        start_date: at(10),
        description: String::new(),
        location: "Room 4".to_string(),
    };
    let outcomes = uc.notify_meeting(&[1, 2, 3], &meeting).await;

    assert_eq!(outcomes, vec![DispatchOutcome::Queued, DispatchOutcome::Queued]);
    let jobs = queue.jobs();
    let recipients: Vec<&str> = jobs.iter().map(|j| j.recipient_email.as_str()).collect();
    assert_eq!(recipients, vec!["ann@example.com", "bob@example.com"]);
    assert_eq!(jobs[0].body, "Hello Ann Lee, see you at Room 4");
    assert_eq!(jobs[0].subject, "Kickoff Monday, March 9, 2026 10:00 AM");
}

#[tokio::test]
async fn test_missing_template_sends_nothing() {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_user(User::new(1, "Ann", "Lee", "ann@example.com"))
        .await;
    store.set_announcement_notification(true).await;
    let mailer = Arc::new(RecordingMailTransport::new());
    let uc = schedule_uc(store, mailer.clone(), Arc::new(RecordingJobQueue::new()));

    let announcement = Announcement {
        title: "Holiday".to_string(),
        start_date: at(9),
        end_date: at(17),
        description: String::new(),
    };
    let outcomes = uc.notify_announcement(&[1], &announcement).await;

    assert!(outcomes.is_empty());
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_sync_transport_failure_reports_false_status() {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_template(EmailTemplate::new(
            1,
            TemplateType::WelcomeEmail,
            "Welcome to {COMPANY_NAME}",
            "<p>{NAME}</p>",
        ))
        .await;
    let metrics = metrics();
    let uc = account_uc(store, Arc::new(FailingMailTransport), metrics.clone());

    let user = User::new(4, "Eve", "Stone", "eve@example.com");
    let result = uc.send_invite(&user).await.unwrap();

    assert!(!result.status);
    assert!(result.message.unwrap().contains("connection refused"));
    assert_eq!(
        metrics.notification_count("welcome_email", "immediate", "failed"),
        1
    );
}

#[tokio::test]
async fn test_substituted_values_are_not_rescanned() {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_template(EmailTemplate::new(
            1,
            TemplateType::WelcomeEmail,
            "Welcome to {COMPANY_NAME}",
            "Hi {NAME}, join {COMPANY_NAME}",
        ))
        .await;
    let mailer = Arc::new(RecordingMailTransport::new());
    let uc = account_uc(store, mailer.clone(), metrics());

    let user = User::new(5, "{COMPANY_NAME}", "Smith", "smith@example.com");
    let result = uc.send_invite(&user).await.unwrap();

    assert!(result.status);
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].html_body, "Hi {COMPANY_NAME} Smith, join Acme");
    assert_eq!(sent[0].subject, "Welcome to Acme");
    assert_eq!(sent[0].to_name, "{COMPANY_NAME}");
}

#[tokio::test]
async fn test_unregistered_account_template_returns_none() {
    let store = Arc::new(InMemoryStore::new());
    let mailer = Arc::new(RecordingMailTransport::new());
    let uc = account_uc(store, mailer.clone(), metrics());

    let user = User::new(6, "Max", "Moe", "max@example.com");
    assert!(uc.send_forgot_password(&user, "https://app.example.com/reset/abc").await.is_none());
    assert!(mailer.sent().is_empty());
}
