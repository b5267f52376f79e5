use serde::{Deserialize, Serialize};

/// 指标种类。`bb` 作为布林带的别名接受。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Volume,
    #[serde(alias = "bb")]
    Bollinger,
    Macd,
}

impl IndicatorKind {
    /// 未指定颜色时的默认主线颜色。
    pub fn default_color(&self) -> &'static str {
        match self {
            IndicatorKind::Sma | IndicatorKind::Macd => "#2563eb",
            IndicatorKind::Ema => "#f97316",
            IndicatorKind::Rsi => "#8b5cf6",
            IndicatorKind::Volume => "#94a3b8",
            IndicatorKind::Bollinger => "#0ea5e9",
        }
    }
}

/// # Summary
/// 单个指标实例的配置。
///
/// # Invariants
/// - `id` 在同一图表内唯一，增删指标以 `id` 为粒度。
/// - 未给出的参数在计算时取默认值（见各 `*_or_default` 方法）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IndicatorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mult: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl IndicatorSpec {
    pub fn new(id: impl Into<String>, kind: IndicatorKind) -> Self {
        Self {
            id: id.into(),
            kind,
            length: None,
            mult: None,
            fast: None,
            slow: None,
            signal: None,
            color: None,
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_mult(mut self, mult: f64) -> Self {
        self.mult = Some(mult);
        self
    }

    pub fn with_macd(mut self, fast: usize, slow: usize, signal: usize) -> Self {
        self.fast = Some(fast);
        self.slow = Some(slow);
        self.signal = Some(signal);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// sma / ema / bollinger 默认 20，rsi 默认 14。
    pub fn length_or_default(&self) -> usize {
        self.length.unwrap_or(match self.kind {
            IndicatorKind::Rsi => 14,
            _ => 20,
        })
    }

    pub fn mult_or_default(&self) -> f64 {
        self.mult.unwrap_or(2.0)
    }

    /// MACD 的 (fast, slow, signal)，默认 (12, 26, 9)。
    pub fn macd_or_default(&self) -> (usize, usize, usize) {
        (
            self.fast.unwrap_or(12),
            self.slow.unwrap_or(26),
            self.signal.unwrap_or(9),
        )
    }

    pub fn color_or_default(&self) -> String {
        self.color
            .clone()
            .unwrap_or_else(|| self.kind.default_color().to_string())
    }
}

/// 成交量柱：数值与方向（阳线为 true）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBar {
    pub value: f64,
    pub bullish: bool,
}

/// # Summary
/// 指标派生序列，下标与输入价格序列一一对应。
///
/// # Invariants
/// - 所有向量长度等于输入长度。
/// - 历史不足的位置为 `None`，绝不以占位数值代替。
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedSeries {
    // 单线指标：sma / ema / rsi
    Line(Vec<Option<f64>>),
    // 布林带：中轨 / 上轨 / 下轨
    Bands {
        basis: Vec<Option<f64>>,
        upper: Vec<Option<f64>>,
        lower: Vec<Option<f64>>,
    },
    // MACD：快慢线差 / 信号线 / 柱
    Macd {
        macd: Vec<Option<f64>>,
        signal: Vec<Option<f64>>,
        histogram: Vec<Option<f64>>,
    },
    // 成交量柱
    Histogram(Vec<HistogramBar>),
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        match self {
            DerivedSeries::Line(v) => v.len(),
            DerivedSeries::Bands { basis, .. } => basis.len(),
            DerivedSeries::Macd { macd, .. } => macd.len(),
            DerivedSeries::Histogram(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 输出序列的渲染形态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStyle {
    Line,
    Histogram,
}

/// 单个可渲染样本，仅包含已定义的数值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSample {
    pub time: i64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// # Summary
/// 交付给宿主图表渲染的序列，以指标 id（或子 id）为键。
///
/// # Invariants
/// - 多线指标的子序列 id 形如 `{id}-upper`、`{id}-signal`。
/// - `samples` 中不存在未定义值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesOutput {
    pub id: String,
    pub style: SeriesStyle,
    pub color: String,
    pub samples: Vec<SeriesSample>,
}

impl SeriesOutput {
    /// 最新一个已定义样本的数值，常用于由指标创建穿越告警。
    pub fn last_value(&self) -> Option<f64> {
        self.samples.last().map(|s| s.value)
    }
}
