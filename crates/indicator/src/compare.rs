use kasen_core::indicator::entity::{SeriesOutput, SeriesSample, SeriesStyle};
use kasen_core::market::entity::PricePoint;
use serde::{Deserialize, Serialize};

/// 未指定颜色时按叠加序号轮换的调色板。
pub const COMPARE_PALETTE: [&str; 4] = ["#ec4899", "#0ea5e9", "#f59e0b", "#10b981"];

/// # Summary
/// 对比叠加序列：把另一标的的收盘价归一化后叠加到主图上。
///
/// # Invariants
/// - `base` 为非百分比模式下的缩放基准，缺省为 1。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
}

impl CompareSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            color: None,
            base: None,
        }
    }
}

/// # Summary
/// 生成对比叠加序列。
///
/// # Logic
/// 1. 以首根收盘价为基准 `base0`。
/// 2. 百分比模式输出 `(v / base0 - 1) * 100`，否则输出 `(v / base0) * base`。
/// 3. 丢弃非有限值（如首价为 0 导致的除零）。
///
/// # Arguments
/// * `index`: 叠加序号，用于在调色板中选择默认颜色。
pub fn compare_series(
    spec: &CompareSpec,
    index: usize,
    points: &[PricePoint],
    percent: bool,
) -> SeriesOutput {
    let color = spec
        .color
        .clone()
        .unwrap_or_else(|| COMPARE_PALETTE[index % COMPARE_PALETTE.len()].to_string());

    let samples = match points.first() {
        Some(first) => {
            let base0 = first.close;
            let scale = spec.base.unwrap_or(1.0);
            points
                .iter()
                .filter_map(|p| {
                    let ratio = p.close / base0;
                    let value = if percent {
                        (ratio - 1.0) * 100.0
                    } else {
                        ratio * scale
                    };
                    value.is_finite().then_some(SeriesSample {
                        time: p.time,
                        value,
                        color: None,
                    })
                })
                .collect()
        }
        None => Vec::new(),
    };

    SeriesOutput {
        id: spec.id.clone(),
        style: SeriesStyle::Line,
        color,
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_mode() {
        let points = [PricePoint::flat(1, 50.0), PricePoint::flat(2, 55.0)];
        let out = compare_series(&CompareSpec::new("cmp"), 0, &points, true);
        assert_eq!(out.samples[0].value, 0.0);
        assert!((out.samples[1].value - 10.0).abs() < 1e-9);
        assert_eq!(out.color, COMPARE_PALETTE[0]);
    }

    #[test]
    fn test_scaled_mode_and_palette_rotation() {
        let points = [PricePoint::flat(1, 2.0), PricePoint::flat(2, 3.0)];
        let mut spec = CompareSpec::new("cmp");
        spec.base = Some(100.0);
        let out = compare_series(&spec, 5, &points, false);
        assert_eq!(out.samples[1].value, 150.0);
        assert_eq!(out.color, COMPARE_PALETTE[1]);
    }

    #[test]
    fn test_zero_base_drops_non_finite() {
        let points = [PricePoint::flat(1, 0.0), PricePoint::flat(2, 3.0)];
        let out = compare_series(&CompareSpec::new("cmp"), 0, &points, true);
        assert!(out.samples.is_empty());
    }
}
