use futures::StreamExt;
use kasen_core::common::ChartKey;
use kasen_core::market::error::MarketError;
use kasen_core::market::port::PriceFeed;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::source::{SourceEvent, SourceKind};
use crate::tick::decode_tick;

/// # Summary
/// 显式持有的实时行情连接。
///
/// # Invariants
/// - 同一时刻至多一个读取协程；重复 `open` 会先关闭旧协程。
/// - 连接对象被丢弃时读取协程随之中止。
pub struct FeedConnection {
    feed: Arc<dyn PriceFeed>,
    key: ChartKey,
    task: Option<AbortHandle>,
}

impl FeedConnection {
    pub fn new(feed: Arc<dyn PriceFeed>, key: ChartKey) -> Self {
        Self {
            feed,
            key,
            task: None,
        }
    }

    pub fn key(&self) -> &ChartKey {
        &self.key
    }

    pub fn is_open(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// # Summary
    /// 订阅行情并启动读取协程。
    ///
    /// # Logic
    /// 1. 关闭可能存在的旧协程。
    /// 2. 通过 `PriceFeed` 订阅原始报文流。
    /// 3. 协程逐条解码：合法报文转发为 `SourceEvent::Point`，非法报文记录 warn 后丢弃。
    /// 4. 流结束时发送 `SourceEvent::Ended`。
    ///
    /// # Errors
    /// 订阅失败时返回 `MarketError`，连接保持关闭。
    pub async fn open(&mut self, tx: mpsc::Sender<SourceEvent>) -> Result<(), MarketError> {
        self.close();
        let mut stream = self.feed.subscribe(&self.key).await?;
        let key = self.key.clone();

        let handle = tokio::spawn(async move {
            info!("Live feed for {} opened", key);
            while let Some(raw) = stream.next().await {
                match decode_tick(&raw) {
                    Ok(point) => {
                        if tx.send(SourceEvent::Point(point)).await.is_err() {
                            debug!("Live feed consumer for {} gone", key);
                            return;
                        }
                    }
                    Err(e) => warn!("Discarding malformed tick for {}: {}", key, e),
                }
            }
            info!("Live feed for {} ended", key);
            if tx.send(SourceEvent::Ended(SourceKind::Live)).await.is_err() {
                debug!("Live feed consumer for {} gone before end", key);
            }
        });
        self.task = Some(handle.abort_handle());
        Ok(())
    }

    /// 中止读取协程，未打开时无操作。
    pub fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Live feed for {} closed", self.key);
        }
    }
}

impl Drop for FeedConnection {
    fn drop(&mut self) {
        self.close();
    }
}
