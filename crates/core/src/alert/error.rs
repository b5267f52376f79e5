use thiserror::Error;

/// # Summary
/// 告警域错误枚举。
///
/// # Invariants
/// - 告警求值本身不产生错误，缺失的可选字段仅令对应分支不成立。
#[derive(Error, Debug)]
pub enum AlertError {
    /// 告警配置不完整（如 above 缺少价格）
    #[error("Invalid alert {id}: {reason}")]
    Invalid { id: String, reason: String },

    /// 下游投递失败
    #[error("Delivery error: {0}")]
    Delivery(String),
}
