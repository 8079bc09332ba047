use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingRepository: Send + Sync {
    /// 設定行が存在しない場合は false を返す。
    async fn announcement_notification_enabled(&self) -> anyhow::Result<bool>;
}
