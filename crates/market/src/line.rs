use async_trait::async_trait;
use kasen_core::common::ChartKey;
use kasen_core::market::error::MarketError;
use kasen_core::market::port::{PriceFeed, TickStream};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// # Summary
/// 按行读取 JSON 报文的行情源（每行一个 JSON 对象），常用于标准输入或录制文件。
///
/// # Invariants
/// - 底层读取器只能被订阅一次，再次订阅返回 `MarketError::Closed`。
/// - 无法解析为 JSON 的行记录 warn 后跳过，字段校验交由解码器。
pub struct LineFeed<R> {
    reader: Mutex<Option<R>>,
}

impl<R> LineFeed<R>
where
    R: AsyncBufRead + Send + Unpin + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
        }
    }
}

#[async_trait]
impl<R> PriceFeed for LineFeed<R>
where
    R: AsyncBufRead + Send + Unpin + 'static,
{
    async fn subscribe(&self, key: &ChartKey) -> Result<TickStream, MarketError> {
        let reader = self.reader.lock().await.take().ok_or(MarketError::Closed)?;
        info!("Reading ticks for {} from line feed", key);

        let stream = async_stream::stream! {
            let mut lines = reader.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<serde_json::Value>(line) {
                            Ok(value) => yield value,
                            Err(e) => warn!("Skipping non-JSON line: {}", e),
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Line feed read error: {}", e);
                        break;
                    }
                }
            }
        };
        Ok(Box::pin(stream))
    }
}
