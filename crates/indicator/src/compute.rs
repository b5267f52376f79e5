use kasen_core::indicator::entity::{DerivedSeries, IndicatorKind, IndicatorSpec};
use kasen_core::indicator::error::IndicatorError;
use kasen_core::market::entity::PricePoint;

use crate::bollinger::bollinger;
use crate::ema::ema;
use crate::macd::macd;
use crate::rsi::rsi;
use crate::sma::sma;
use crate::volume::volume;

/// # Summary
/// 按指标配置计算派生序列。
///
/// # Invariants
/// - 输出各向量长度等于 `points.len()`。
/// - 空输入返回空序列，不视为错误。
///
/// # Errors
/// 任一周期参数为 0，或布林带倍数为负数 / 非有限值时返回 `InvalidParameter`。
pub fn compute(
    spec: &IndicatorSpec,
    points: &[PricePoint],
) -> Result<DerivedSeries, IndicatorError> {
    let closes: Vec<f64> = points.iter().map(|p| p.close).collect();

    let series = match spec.kind {
        IndicatorKind::Sma => DerivedSeries::Line(sma(&closes, length(spec)?)),
        IndicatorKind::Ema => DerivedSeries::Line(ema(&closes, length(spec)?)),
        IndicatorKind::Rsi => DerivedSeries::Line(rsi(&closes, length(spec)?)),
        IndicatorKind::Volume => DerivedSeries::Histogram(volume(points)),
        IndicatorKind::Bollinger => {
            let length = length(spec)?;
            let mult = spec.mult_or_default();
            if !mult.is_finite() || mult < 0.0 {
                return Err(IndicatorError::InvalidParameter {
                    id: spec.id.clone(),
                    reason: format!("mult must be finite and non-negative, got {}", mult),
                });
            }
            let bands = bollinger(&closes, length, mult);
            DerivedSeries::Bands {
                basis: bands.basis,
                upper: bands.upper,
                lower: bands.lower,
            }
        }
        IndicatorKind::Macd => {
            let (fast, slow, signal) = spec.macd_or_default();
            let lines = macd(
                &closes,
                positive(spec, "fast", fast)?,
                positive(spec, "slow", slow)?,
                positive(spec, "signal", signal)?,
            );
            DerivedSeries::Macd {
                macd: lines.macd,
                signal: lines.signal,
                histogram: lines.histogram,
            }
        }
    };
    Ok(series)
}

fn length(spec: &IndicatorSpec) -> Result<usize, IndicatorError> {
    positive(spec, "length", spec.length_or_default())
}

fn positive(spec: &IndicatorSpec, name: &str, value: usize) -> Result<usize, IndicatorError> {
    if value == 0 {
        return Err(IndicatorError::InvalidParameter {
            id: spec.id.clone(),
            reason: format!("{} must be greater than 0", name),
        });
    }
    Ok(value)
}
