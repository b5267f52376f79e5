use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod time;

/// # Summary
/// 图表时间周期枚举，定义 K 线的时间跨度。
///
/// # Invariants
/// - `FromStr` 解析大小写不敏感（"5M" 与 "5m" 等价）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    // 1分钟
    #[serde(rename = "1m", alias = "Minute1")]
    Minute1,
    // 5分钟
    #[serde(rename = "5m", alias = "Minute5")]
    Minute5,
    // 15分钟
    #[serde(rename = "15m", alias = "Minute15")]
    Minute15,
    // 1小时
    #[serde(rename = "1h", alias = "Hour1")]
    Hour1,
    // 4小时
    #[serde(rename = "4h", alias = "Hour4")]
    Hour4,
    // 1日
    #[serde(rename = "1d", alias = "Day1")]
    Day1,
}

impl TimeFrame {
    /// 该周期对应的秒数。
    pub fn seconds(&self) -> i64 {
        match self {
            TimeFrame::Minute1 => 60,
            TimeFrame::Minute5 => 300,
            TimeFrame::Minute15 => 900,
            TimeFrame::Hour1 => 3_600,
            TimeFrame::Hour4 => 14_400,
            TimeFrame::Day1 => 86_400,
        }
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "minute1" => Ok(TimeFrame::Minute1),
            "5m" | "minute5" => Ok(TimeFrame::Minute5),
            "15m" | "minute15" => Ok(TimeFrame::Minute15),
            "1h" | "hour1" => Ok(TimeFrame::Hour1),
            "4h" | "hour4" => Ok(TimeFrame::Hour4),
            "1d" | "day1" => Ok(TimeFrame::Day1),
            _ => Err(format!("Unknown TimeFrame: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeFrame::Minute1 => write!(f, "1m"),
            TimeFrame::Minute5 => write!(f, "5m"),
            TimeFrame::Minute15 => write!(f, "15m"),
            TimeFrame::Hour1 => write!(f, "1h"),
            TimeFrame::Hour4 => write!(f, "4h"),
            TimeFrame::Day1 => write!(f, "1d"),
        }
    }
}

/// # Summary
/// 图表身份键，由标的代码与时间周期组成。
/// 绘图集合、行情订阅均以此为粒度隔离。
///
/// # Invariants
/// - `symbol` 原样保留（允许 "EUR/USD" 这类带分隔符的代码）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartKey {
    // 标的代码
    pub symbol: String,
    // 时间周期
    pub timeframe: TimeFrame,
}

impl ChartKey {
    pub fn new(symbol: impl Into<String>, timeframe: TimeFrame) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }

    /// # Summary
    /// 绘图集合在 KV 存储中的键。
    ///
    /// # Returns
    /// 形如 `drawings:{symbol}:{timeframe}` 的字符串。
    pub fn drawings_key(&self) -> String {
        format!("drawings:{}:{}", self.symbol, self.timeframe)
    }
}

impl std::fmt::Display for ChartKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.timeframe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parse_case_insensitive() {
        assert_eq!("5M".parse::<TimeFrame>(), Ok(TimeFrame::Minute5));
        assert_eq!("1h".parse::<TimeFrame>(), Ok(TimeFrame::Hour1));
        assert!("7x".parse::<TimeFrame>().is_err());
    }

    #[test]
    fn test_drawings_key_format() {
        let key = ChartKey::new("EUR/USD", TimeFrame::Minute5);
        assert_eq!(key.drawings_key(), "drawings:EUR/USD:5m");
    }
}
