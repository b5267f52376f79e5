use thiserror::Error;

/// # Summary
/// 绘图域错误枚举。
///
/// # Invariants
/// - 指针操作中的坐标越界不是错误，由状态机静默中止。
#[derive(Error, Debug)]
pub enum DrawingError {
    // 绘图集合持久化失败（内存数据仍然有效）
    #[error("Persist error: {0}")]
    Persist(String),
    // 绘图集合加载失败
    #[error("Load error: {0}")]
    Load(String),
    // 标注的点数不满足工具要求
    #[error("Incomplete annotation {id}: {tool} needs {required} points, got {got}")]
    Incomplete {
        id: String,
        tool: String,
        required: usize,
        got: usize,
    },
}
