use thiserror::Error;

/// # Summary
/// 存储层错误枚举，处理序列化与底层介质读写失败。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 数据序列化失败
    #[error("Serialize error: {0}")]
    Serialize(String),
    /// 数据反序列化失败
    #[error("Deserialize error: {0}")]
    Deserialize(String),
    /// 底层存储介质故障
    #[error("Storage error: {0}")]
    Storage(String),
    /// 初始化存储失败
    #[error("Initialization error: {0}")]
    InitError(String),
}
