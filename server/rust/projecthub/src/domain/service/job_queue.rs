use async_trait::async_trait;

use crate::domain::entity::notification::NotificationJob;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue closed")]
    Closed,

    #[error("queue is full: {0} jobs pending")]
    Full(usize),

    #[error("enqueue failed: {0}")]
    Other(String),
}

/// JobQueue は遅延送信ジョブの投入口。投入後のジョブは取り消せない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: NotificationJob) -> Result<(), QueueError>;
}
