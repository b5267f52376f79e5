use serde::{Deserialize, Serialize};

/// # Summary
/// 单根价格数据点（K 线），记录特定时段内的行情波动。
///
/// # Invariants
/// - `time` 为 Unix 秒，在同一序列中严格递增。
/// - 所有价格字段均为有限值（非 NaN / 非无穷）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    // 时段开始时间 (Unix 秒)
    pub time: i64,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
}

impl PricePoint {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// 以单一价格构造四价相同的数据点，常用于折线行情与测试。
    pub fn flat(time: i64, price: f64) -> Self {
        Self::new(time, price, price, price, price)
    }

    /// 收盘价不低于开盘价即视为阳线。
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// 最高价与最低价之差。
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
