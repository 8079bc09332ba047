//! テスト用のメールトランスポート・ジョブキューとヘルパー。
//! 統合テスト（tests/）から利用する。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapter::handler::AppState;
use crate::adapter::repository::InMemoryStore;
use crate::domain::entity::notification::{NotificationJob, OutgoingMail};
use crate::domain::service::{DeliveryError, JobQueue, MailTransport, QueueError};
use crate::domain::value_object::SiteConfig;
use crate::infrastructure::metrics::Metrics;
use crate::usecase::{
    Dispatcher, GetDashboardUseCase, GetTemplateUseCase, ListTemplatesUseCase, NotifyUseCase,
    SendAccountEmailUseCase, SendActivityNotificationUseCase, SendScheduleNotificationUseCase,
    UpdateTemplateUseCase,
};

// ---------------------------------------------------------------------------
// RecordingMailTransport
// ---------------------------------------------------------------------------

/// 送信されたメールを記録するだけのトランスポート。
#[derive(Default)]
pub struct RecordingMailTransport {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for RecordingMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail.clone());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FailingMailTransport
// ---------------------------------------------------------------------------

/// 常に接続エラーを返すトランスポート。
#[derive(Default)]
pub struct FailingMailTransport;

#[async_trait]
impl MailTransport for FailingMailTransport {
    async fn send(&self, _mail: &OutgoingMail) -> Result<(), DeliveryError> {
        Err(DeliveryError::ConnectionFailed("connection refused".to_string()))
    }
}

// ---------------------------------------------------------------------------
// RecordingJobQueue
// ---------------------------------------------------------------------------

/// 投入されたジョブを記録するだけのキュー。ジョブは実行しない。
#[derive(Default)]
pub struct RecordingJobQueue {
    jobs: Mutex<Vec<NotificationJob>>,
}

impl RecordingJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<NotificationJob> {
        self.jobs.lock().map(|j| j.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl JobQueue for RecordingJobQueue {
    async fn enqueue(&self, job: NotificationJob) -> Result<(), QueueError> {
        self.jobs
            .lock()
            .map_err(|e| QueueError::Other(e.to_string()))?
            .push(job);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn test_site() -> SiteConfig {
    SiteConfig {
        company_name: "Acme".to_string(),
        app_url: "https://api.example.com".to_string(),
        front_url: "https://app.example.com".to_string(),
        activation_expire_secs: 86_400,
    }
}

/// インメモリストアを使う NotifyUseCase を生成する。
pub fn make_notify(
    store: Arc<InMemoryStore>,
    mailer: Arc<dyn MailTransport>,
    queue: Arc<dyn JobQueue>,
    metrics: Arc<Metrics>,
) -> Arc<NotifyUseCase> {
    let dispatcher = Arc::new(Dispatcher::new(mailer, queue, metrics));
    Arc::new(NotifyUseCase::new(store, dispatcher))
}

/// インメモリストアと記録用トランスポート・キューから AppState を組み立てる。
pub fn make_test_app_state(
    store: Arc<InMemoryStore>,
    mailer: Arc<dyn MailTransport>,
    queue: Arc<dyn JobQueue>,
) -> anyhow::Result<AppState> {
    let metrics = Arc::new(Metrics::new("k1s0-projecthub-server-test")?);
    let notify = make_notify(store.clone(), mailer, queue, metrics.clone());

    Ok(AppState {
        get_dashboard_uc: Arc::new(GetDashboardUseCase::new(store.clone())),
        list_templates_uc: Arc::new(ListTemplatesUseCase::new(store.clone())),
        get_template_uc: Arc::new(GetTemplateUseCase::new(store.clone())),
        update_template_uc: Arc::new(UpdateTemplateUseCase::new(store.clone())),
        send_activity_uc: Arc::new(SendActivityNotificationUseCase::new(
            notify.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            test_site(),
        )),
        send_schedule_uc: Arc::new(SendScheduleNotificationUseCase::new(
            notify.clone(),
            store.clone(),
            store.clone(),
            test_site(),
        )),
        send_account_uc: Arc::new(SendAccountEmailUseCase::new(notify, test_site())),
        user_repo: store,
        metrics,
    })
}
