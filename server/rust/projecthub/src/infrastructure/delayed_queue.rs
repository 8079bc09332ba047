use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::domain::entity::notification::NotificationJob;
use crate::domain::service::{JobQueue, MailTransport, QueueError};
use crate::infrastructure::config::QueueConfig;
use crate::infrastructure::metrics::Metrics;

/// DelayedJobQueue はプロセス内の遅延送信キュー。
/// 投入されたジョブは遅延時間の経過後にワーカーがメールトランスポートへ渡す。
/// 未完了のジョブ数は capacity を上限とし、超えた投入は拒否する。
pub struct DelayedJobQueue {
    sender: mpsc::Sender<Pending>,
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// QueueWorker はキューのワーカータスクを停止・待機するためのハンドル。
pub struct QueueWorker {
    join: tokio::task::JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl QueueWorker {
    /// 新規ジョブの受付を止め、待機中のジョブは残りの遅延を待たずに 1 回ずつ送信させる。
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    pub async fn join(self) {
        if let Err(e) = self.join.await {
            tracing::error!(error = %e, "queue worker panicked");
        }
    }
}

/// 配信が終わるまで permit を保持し、その間は枠を占有する。
struct Pending {
    job: NotificationJob,
    _permit: OwnedSemaphorePermit,
}

#[derive(Clone)]
struct Delivery {
    mailer: Arc<dyn MailTransport>,
    metrics: Arc<Metrics>,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl DelayedJobQueue {
    pub fn start(
        mailer: Arc<dyn MailTransport>,
        metrics: Arc<Metrics>,
        cfg: &QueueConfig,
    ) -> (Self, QueueWorker) {
        let capacity = cfg.capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let cancel_token = CancellationToken::new();
        let delivery = Delivery {
            mailer,
            metrics,
            max_attempts: cfg.max_attempts.max(1),
            retry_backoff: Duration::from_secs(cfg.retry_backoff_secs),
        };
        let join = tokio::spawn(run(receiver, delivery, cancel_token.clone()));
        let queue = Self {
            sender,
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        };
        (queue, QueueWorker { join, cancel_token })
    }
}

#[async_trait]
impl JobQueue for DelayedJobQueue {
    async fn enqueue(&self, job: NotificationJob) -> Result<(), QueueError> {
        if self.sender.is_closed() {
            return Err(QueueError::Closed);
        }
        let permit = self
            .permits
            .clone()
            .try_acquire_owned()
            .map_err(|_| QueueError::Full(self.capacity))?;
        self.sender
            .try_send(Pending {
                job,
                _permit: permit,
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => QueueError::Full(self.capacity),
                mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
            })
    }
}

async fn run(mut receiver: mpsc::Receiver<Pending>, delivery: Delivery, token: CancellationToken) {
    let tracker = TaskTracker::new();
    loop {
        tokio::select! {
            () = token.cancelled() => break,
            pending = receiver.recv() => {
                let Some(pending) = pending else { break };
                spawn_delivery(&tracker, pending, &delivery, &token);
            }
        }
    }

    // 停止後は受付を閉じ、バッファに残ったジョブも送信対象にする。
    receiver.close();
    while let Some(pending) = receiver.recv().await {
        spawn_delivery(&tracker, pending, &delivery, &token);
    }
    tracker.close();
    tracker.wait().await;
    tracing::info!("queue worker stopped");
}

fn spawn_delivery(
    tracker: &TaskTracker,
    pending: Pending,
    delivery: &Delivery,
    token: &CancellationToken,
) {
    let delivery = delivery.clone();
    let token = token.clone();
    tracker.spawn(async move {
        tokio::select! {
            () = token.cancelled() => {
                tracing::info!(recipient = %pending.job.recipient_email, "queue stopping; sending pending job now");
            }
            () = tokio::time::sleep(pending.job.delay) => {}
        }
        delivery.deliver(&pending.job, &token).await;
    });
}

impl Delivery {
    async fn deliver(&self, job: &NotificationJob, token: &CancellationToken) {
        let mail = job.to_mail();
        for attempt in 1..=self.max_attempts {
            match self.mailer.send(&mail).await {
                Ok(()) => {
                    self.metrics.record_queue_job("delivered");
                    tracing::info!(recipient = %job.recipient_email, attempt, "queued notification delivered");
                    return;
                }
                Err(e) if attempt < self.max_attempts && !token.is_cancelled() => {
                    self.metrics.record_queue_job("retried");
                    tracing::warn!(
                        recipient = %job.recipient_email,
                        attempt,
                        error = %e,
                        "queued notification failed; retrying"
                    );
                    tokio::select! {
                        () = token.cancelled() => {
                            self.abandon(job, attempt);
                            return;
                        }
                        () = tokio::time::sleep(self.retry_backoff) => {}
                    }
                }
                Err(e) if attempt < self.max_attempts => {
                    tracing::warn!(recipient = %job.recipient_email, attempt, error = %e, "queued notification failed");
                    self.abandon(job, attempt);
                    return;
                }
                Err(e) => {
                    self.metrics.record_queue_job("failed");
                    tracing::error!(
                        recipient = %job.recipient_email,
                        attempt,
                        error = %e,
                        "queued notification failed; giving up"
                    );
                }
            }
        }
    }

    /// 停止中のため残りのリトライを行わずに破棄する。
    fn abandon(&self, job: &NotificationJob, attempt: u32) {
        self.metrics.record_queue_job("dropped");
        tracing::warn!(
            recipient = %job.recipient_email,
            attempt,
            "queue stopped before retry; job dropped"
        );
    }
}
