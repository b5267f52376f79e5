use crate::common::TimeFrame;
use crate::indicator::entity::{IndicatorKind, IndicatorSpec};
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub chart: ChartConfig,
    pub drawing: DrawingConfig,
    pub replay: ReplayConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub symbol: String,
    pub timeframe: TimeFrame,
    // 价格缓冲区容量上限
    pub buffer_capacity: usize,
    // 打开图表时加载的指标
    pub indicators: Vec<IndicatorSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    // 是否启用价格吸附
    pub snap: bool,
    // 线段类命中容差（像素）
    pub hit_tolerance: f64,
    // 点标记命中容差倍数
    pub marker_tolerance_factor: f64,
    // 画笔采样最小像素间距
    pub brush_min_distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    // 回放倍速，1 表示每秒推送一根
    pub speed: u32,
    // 回放数据文件（每行一个 JSON 报文）；为空时读取实时行情
    pub source: Option<String>,
    // 回放起始游标，为空时从最后一根开始
    pub cursor: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            symbol: "EUR/USD".to_string(),
            timeframe: TimeFrame::Minute5,
            buffer_capacity: 500,
            indicators: vec![
                IndicatorSpec::new("sma-20", IndicatorKind::Sma).with_length(20),
                IndicatorSpec::new("ema-50", IndicatorKind::Ema).with_length(50),
            ],
        }
    }
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            snap: true,
            hit_tolerance: 6.0,
            marker_tolerance_factor: 1.5,
            brush_min_distance: 2.0,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: 1,
            source: None,
            cursor: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
