use kasen_core::market::entity::PricePoint;
use kasen_core::market::error::MarketError;
use tracing::warn;

use crate::buffer::RollingBuffer;

pub const DEFAULT_CAPACITY: usize = 500;

/// # Summary
/// 有界价格历史，指标与告警计算的唯一数据来源。
///
/// # Invariants
/// - 时间严格递增，乱序或重复时间的数据点被拒绝。
/// - 超出容量时淘汰最旧的数据点。
#[derive(Debug, Clone)]
pub struct PriceHistory {
    buffer: RollingBuffer<PricePoint>,
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PriceHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: RollingBuffer::new(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.buffer.last()
    }

    pub fn to_vec(&self) -> Vec<PricePoint> {
        self.buffer.to_vec()
    }

    /// # Summary
    /// 追加一个数据点。
    ///
    /// # Errors
    /// 时间不晚于最新数据点时返回 `MarketError::OutOfOrder`，缓冲区不变。
    pub fn push(&mut self, point: PricePoint) -> Result<(), MarketError> {
        if let Some(last) = self.buffer.last() {
            if point.time <= last.time {
                return Err(MarketError::OutOfOrder {
                    time: point.time,
                    last: last.time,
                });
            }
        }
        self.buffer.push(point);
        Ok(())
    }

    /// # Summary
    /// 用一批数据整体替换历史（回放重置、批量加载）。
    ///
    /// # Logic
    /// 清空后逐个追加，乱序点记录 warn 后跳过。
    ///
    /// # Returns
    /// 被跳过的数据点数量。
    pub fn replace(&mut self, points: impl IntoIterator<Item = PricePoint>) -> usize {
        self.buffer.clear();
        let mut skipped = 0;
        for point in points {
            if let Err(e) = self.push(point) {
                warn!("Skipping point during reload: {}", e);
                skipped += 1;
            }
        }
        skipped
    }
}
