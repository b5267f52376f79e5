use kasen_core::market::entity::PricePoint;
use kasen_core::market::error::MarketError;
use std::fmt;
use tokio::sync::mpsc;
use tracing::info;

use crate::feed::FeedConnection;
use crate::replay::ReplayProducer;

/// 数据生产者种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Live,
    Replay,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Live => f.write_str("live"),
            SourceKind::Replay => f.write_str("replay"),
        }
    }
}

/// 生产者发往会话循环的消息。
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    // 新数据点
    Point(PricePoint),
    // 整体替换历史（回放起点）
    Reset(Vec<PricePoint>),
    // 生产者结束
    Ended(SourceKind),
}

enum Active {
    Live(FeedConnection),
    Replay(ReplayProducer),
}

/// # Summary
/// 数据源切换器：保证任一时刻只有一个生产者向会话推送数据。
///
/// # Invariants
/// - 启动新生产者之前必定先中止旧生产者的协程。
/// - 所有生产者共用同一个 `mpsc` 发送端，会话只需消费一个接收端。
pub struct SourceSwitch {
    tx: mpsc::Sender<SourceEvent>,
    active: Option<Active>,
}

impl SourceSwitch {
    /// # Summary
    /// 创建切换器及会话消费的接收端。
    ///
    /// # Arguments
    /// * `buffer`: 通道容量。
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<SourceEvent>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx, active: None }, rx)
    }

    pub fn mode(&self) -> Option<SourceKind> {
        match self.active {
            Some(Active::Live(_)) => Some(SourceKind::Live),
            Some(Active::Replay(_)) => Some(SourceKind::Replay),
            None => None,
        }
    }

    pub fn replay(&self) -> Option<&ReplayProducer> {
        match &self.active {
            Some(Active::Replay(p)) => Some(p),
            _ => None,
        }
    }

    /// # Summary
    /// 切换到实时行情。
    ///
    /// # Errors
    /// 订阅失败时返回 `MarketError`，此时没有任何活动生产者。
    pub async fn go_live(&mut self, mut connection: FeedConnection) -> Result<(), MarketError> {
        self.stop();
        connection.open(self.tx.clone()).await?;
        info!("Source switched to live ({})", connection.key());
        self.active = Some(Active::Live(connection));
        Ok(())
    }

    /// 切换到历史回放。
    pub fn start_replay(&mut self, mut producer: ReplayProducer) {
        self.stop();
        producer.start(self.tx.clone());
        info!(
            "Source switched to replay ({} points, {:?})",
            producer.len(),
            producer.settings()
        );
        self.active = Some(Active::Replay(producer));
    }

    /// 中止当前生产者。
    pub fn stop(&mut self) {
        match self.active.take() {
            Some(Active::Live(mut conn)) => conn.close(),
            Some(Active::Replay(mut producer)) => producer.stop(),
            None => {}
        }
    }
}

impl Drop for SourceSwitch {
    fn drop(&mut self) {
        self.stop();
    }
}
