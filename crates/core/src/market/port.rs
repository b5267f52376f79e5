use crate::common::ChartKey;
use crate::market::error::MarketError;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// # Summary
/// 原始行情报文流别名。
/// 报文保持未解码的 JSON 形态，字段校验由核心层负责。
pub type TickStream = Pin<Box<dyn Stream<Item = serde_json::Value> + Send>>;

/// # Summary
/// 实时行情源接口（外部协作方）。
///
/// # Invariants
/// - 同一订阅内的报文按到达顺序产出，每个 tick 至多一次。
/// - 流结束即视为数据源关闭。
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// # Summary
    /// 订阅某图表的实时报文流。
    ///
    /// # Logic
    /// 1. 建立长连接或开启内部读取。
    /// 2. 持续产出原始报文。
    ///
    /// # Arguments
    /// * `key`: 图表身份（标的 + 周期）。
    ///
    /// # Returns
    /// 成功返回异步报文流，失败返回 `MarketError`。
    async fn subscribe(&self, key: &ChartKey) -> Result<TickStream, MarketError>;
}
