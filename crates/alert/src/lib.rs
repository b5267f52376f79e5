//! 价格 / 指标穿越告警的求值与投递。

pub mod evaluator;
pub mod factory;
pub mod sink;

pub use evaluator::AlertEvaluator;
pub use factory::{alert_from_annotation, alert_from_series};
pub use sink::{ChannelSink, LogSink};
