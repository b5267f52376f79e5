//! 技术指标计算。
//!
//! 所有计算函数都是纯函数：相同输入必然得到相同输出，不依赖时钟与全局状态。
//! 历史不足的位置以 `None` 表示。

pub mod bollinger;
pub mod compare;
pub mod compute;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod set;
pub mod sma;
pub mod volume;

pub use compare::{CompareSpec, compare_series};
pub use compute::compute;
pub use set::IndicatorSet;
