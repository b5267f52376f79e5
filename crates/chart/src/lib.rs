//! 单个图表（标的 + 周期）的应用服务层：
//! 价格历史、指标、对比叠加、告警与绘图在此汇合。

pub mod error;
pub mod session;

pub use error::ChartError;
pub use session::{ChartContext, ChartSession};
