use thiserror::Error;

/// # Summary
/// 指标计算域错误枚举。
///
/// # Invariants
/// - 除零等数值边界在算法内部显式定义，不作为错误上抛。
#[derive(Error, Debug, PartialEq)]
pub enum IndicatorError {
    // 参数非法，如周期为 0
    #[error("Invalid parameter for {id}: {reason}")]
    InvalidParameter { id: String, reason: String },
    // 指定 id 的指标不存在
    #[error("Indicator not found: {0}")]
    NotFound(String),
}
