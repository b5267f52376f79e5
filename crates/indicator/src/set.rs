use kasen_core::indicator::entity::{
    DerivedSeries, HistogramBar, IndicatorSpec, SeriesOutput, SeriesSample, SeriesStyle,
};
use kasen_core::indicator::error::IndicatorError;
use kasen_core::market::entity::PricePoint;
use tracing::{debug, warn};

use crate::compute::compute;

pub const BULL_COLOR: &str = "#16a34a";
pub const BEAR_COLOR: &str = "#ef4444";
pub const SIGNAL_COLOR: &str = "#f97316";
pub const BAND_COLOR: &str = "#0ea5e9";

/// # Summary
/// 以 id 为键的指标集合，负责增删指标并重算全部输出序列。
///
/// # Invariants
/// - 同一 id 至多出现一次，`upsert` 原位替换以保持输出顺序稳定。
/// - 单个指标计算失败只跳过该指标，不影响其余输出。
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    specs: Vec<IndicatorSpec>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: impl IntoIterator<Item = IndicatorSpec>) -> Self {
        let mut set = Self::new();
        for spec in specs {
            set.upsert(spec);
        }
        set
    }

    /// 新增或替换同 id 的指标。
    pub fn upsert(&mut self, spec: IndicatorSpec) {
        match self.specs.iter_mut().find(|s| s.id == spec.id) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
    }

    /// 移除指定 id 的指标，返回被移除的配置。
    pub fn remove(&mut self, id: &str) -> Result<IndicatorSpec, IndicatorError> {
        let pos = self
            .specs
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| IndicatorError::NotFound(id.to_string()))?;
        Ok(self.specs.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&IndicatorSpec> {
        self.specs.iter().find(|s| s.id == id)
    }

    pub fn specs(&self) -> &[IndicatorSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// # Summary
    /// 基于完整价格历史重算全部指标。
    ///
    /// # Logic
    /// 1. 按插入顺序逐个计算派生序列。
    /// 2. 多线指标拆分为带子 id 的输出（`-upper` / `-lower` / `-signal` / `-hist`）。
    /// 3. 仅保留已定义的样本。
    ///
    /// # Returns
    /// 所有可渲染序列；计算失败的指标记录 warn 后跳过。
    pub fn recompute(&self, points: &[PricePoint]) -> Vec<SeriesOutput> {
        let mut outputs = Vec::new();
        for spec in &self.specs {
            match compute(spec, points) {
                Ok(series) => outputs.extend(split(spec, series, points)),
                Err(e) => warn!("Skipping indicator {}: {}", spec.id, e),
            }
        }
        debug!(
            "Recomputed {} indicators into {} series over {} points",
            self.specs.len(),
            outputs.len(),
            points.len()
        );
        outputs
    }
}

fn split(spec: &IndicatorSpec, series: DerivedSeries, points: &[PricePoint]) -> Vec<SeriesOutput> {
    let color = spec.color_or_default();
    match series {
        DerivedSeries::Line(values) => vec![line(spec.id.clone(), color, &values, points)],
        DerivedSeries::Bands {
            basis,
            upper,
            lower,
        } => {
            let band = spec.color.clone().unwrap_or_else(|| BAND_COLOR.to_string());
            vec![
                line(spec.id.clone(), color, &basis, points),
                line(format!("{}-upper", spec.id), band.clone(), &upper, points),
                line(format!("{}-lower", spec.id), band, &lower, points),
            ]
        }
        DerivedSeries::Macd {
            macd,
            signal,
            histogram,
        } => vec![
            line(spec.id.clone(), color, &macd, points),
            line(
                format!("{}-signal", spec.id),
                spec.color.clone().unwrap_or_else(|| SIGNAL_COLOR.to_string()),
                &signal,
                points,
            ),
            signed_histogram(format!("{}-hist", spec.id), &histogram, points),
        ],
        DerivedSeries::Histogram(bars) => vec![volume_histogram(spec.id.clone(), color, &bars, points)],
    }
}

fn line(id: String, color: String, values: &[Option<f64>], points: &[PricePoint]) -> SeriesOutput {
    let samples = points
        .iter()
        .zip(values)
        .filter_map(|(p, v)| {
            v.map(|value| SeriesSample {
                time: p.time,
                value,
                color: None,
            })
        })
        .collect();
    SeriesOutput {
        id,
        style: SeriesStyle::Line,
        color,
        samples,
    }
}

// MACD 柱按正负着色
fn signed_histogram(id: String, values: &[Option<f64>], points: &[PricePoint]) -> SeriesOutput {
    let samples = points
        .iter()
        .zip(values)
        .filter_map(|(p, v)| {
            v.map(|value| SeriesSample {
                time: p.time,
                value,
                color: Some(direction_color(value >= 0.0)),
            })
        })
        .collect();
    SeriesOutput {
        id,
        style: SeriesStyle::Histogram,
        color: BULL_COLOR.to_string(),
        samples,
    }
}

// 成交量柱按 K 线阴阳着色
fn volume_histogram(
    id: String,
    color: String,
    bars: &[HistogramBar],
    points: &[PricePoint],
) -> SeriesOutput {
    let samples = points
        .iter()
        .zip(bars)
        .map(|(p, bar)| SeriesSample {
            time: p.time,
            value: bar.value,
            color: Some(direction_color(bar.bullish)),
        })
        .collect();
    SeriesOutput {
        id,
        style: SeriesStyle::Histogram,
        color,
        samples,
    }
}

fn direction_color(bullish: bool) -> String {
    if bullish { BULL_COLOR } else { BEAR_COLOR }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasen_core::indicator::entity::IndicatorKind;

    fn points(n: i64) -> Vec<PricePoint> {
        (1..=n)
            .map(|t| PricePoint::new(t, 1.0, 2.0, 0.5, if t % 2 == 0 { 1.5 } else { 0.8 }))
            .collect()
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut set = IndicatorSet::new();
        set.upsert(IndicatorSpec::new("a", IndicatorKind::Sma));
        set.upsert(IndicatorSpec::new("b", IndicatorKind::Ema));
        set.upsert(IndicatorSpec::new("a", IndicatorKind::Sma).with_length(5));
        let ids: Vec<&str> = set.specs().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(set.get("a").and_then(|s| s.length), Some(5));
    }

    #[test]
    fn test_remove_unknown_is_not_found() {
        let mut set = IndicatorSet::new();
        assert_eq!(
            set.remove("missing"),
            Err(IndicatorError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_sub_ids_and_colors() {
        let set = IndicatorSet::from_specs([
            IndicatorSpec::new("bb", IndicatorKind::Bollinger).with_length(3),
            IndicatorSpec::new("m", IndicatorKind::Macd).with_macd(2, 4, 3),
            IndicatorSpec::new("v", IndicatorKind::Volume),
        ]);
        let outputs = set.recompute(&points(10));
        let ids: Vec<&str> = outputs.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["bb", "bb-upper", "bb-lower", "m", "m-signal", "m-hist", "v"]
        );
        assert_eq!(outputs[1].color, BAND_COLOR);
        assert_eq!(outputs[4].color, SIGNAL_COLOR);
        assert_eq!(outputs[6].samples[0].color.as_deref(), Some(BEAR_COLOR));
        assert_eq!(outputs[6].samples[1].color.as_deref(), Some(BULL_COLOR));
    }

    #[test]
    fn test_custom_color_applies_to_sub_series() {
        let set = IndicatorSet::from_specs([
            IndicatorSpec::new("bb", IndicatorKind::Bollinger)
                .with_length(3)
                .with_color("#111111"),
            IndicatorSpec::new("m", IndicatorKind::Macd)
                .with_macd(2, 4, 3)
                .with_color("#222222"),
        ]);
        let outputs = set.recompute(&points(10));
        let colors: Vec<&str> = outputs.iter().map(|o| o.color.as_str()).collect();
        assert_eq!(
            &colors[..5],
            &["#111111", "#111111", "#111111", "#222222", "#222222"]
        );
    }

    #[test]
    fn test_only_defined_samples_emitted() {
        let set = IndicatorSet::from_specs([IndicatorSpec::new("s", IndicatorKind::Sma).with_length(4)]);
        let outputs = set.recompute(&points(10));
        assert_eq!(outputs[0].samples.len(), 7);
        assert_eq!(outputs[0].samples[0].time, 4);
    }

    #[test]
    fn test_failing_spec_does_not_disturb_others() {
        let set = IndicatorSet::from_specs([
            IndicatorSpec::new("bad", IndicatorKind::Sma).with_length(0),
            IndicatorSpec::new("ok", IndicatorKind::Rsi),
        ]);
        let outputs = set.recompute(&points(30));
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].id, "ok");
    }
}
