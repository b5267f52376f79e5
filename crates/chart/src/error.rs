use kasen_core::alert::error::AlertError;
use kasen_core::drawing::error::DrawingError;
use kasen_core::indicator::error::IndicatorError;
use kasen_core::market::error::MarketError;
use thiserror::Error;

/// # Summary
/// 图表会话层的统一错误类型，汇总各领域错误。
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Market error: {0}")]
    Market(#[from] MarketError),
    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),
    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),
    #[error("Drawing error: {0}")]
    Drawing(#[from] DrawingError),
    // 引用的标注 / 序列不存在
    #[error("Not found: {0}")]
    NotFound(String),
    // 尚无价格数据，无法确定参考收盘价
    #[error("No price data for {0}")]
    NoData(String),
}
