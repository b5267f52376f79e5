use crate::alert::entity::AlertTriggered;
use crate::alert::error::AlertError;
use async_trait::async_trait;

/// # Summary
/// 告警触发事件的下游接收方。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持在会话协程中调用。
/// - 每个告警在生命周期内只会被投递一次。
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// # Summary
    /// 投递一次告警触发事件。
    ///
    /// # Returns
    /// * 成功返回 `Ok(())`。
    /// * 失败返回 `Err(AlertError::Delivery)`，不影响告警已触发的状态。
    async fn deliver(&self, event: &AlertTriggered) -> Result<(), AlertError>;
}
