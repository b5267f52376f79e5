use thiserror::Error;

/// # Summary
/// 行情域错误枚举，处理连接、解析及序列顺序等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum MarketError {
    // 连接层错误
    #[error("Connection error: {0}")]
    Connection(String),
    // 原始报文解析错误，如字段缺失或非数值
    #[error("Parse error: {0}")]
    Parse(String),
    // 数据点时间未严格递增
    #[error("Out of order point: time {time} is not after {last}")]
    OutOfOrder { time: i64, last: i64 },
    // 数据源已关闭
    #[error("Feed closed")]
    Closed,
}
