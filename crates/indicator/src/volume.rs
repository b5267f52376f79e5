use kasen_core::indicator::entity::HistogramBar;
use kasen_core::market::entity::PricePoint;

// 振幅为 0 的 K 线仍保留一根可见的柱
const MIN_BAR: f64 = 0.0001;

/// # Summary
/// 以 K 线振幅近似的成交量柱（数据源不提供真实成交量）。
///
/// # Logic
/// 柱高 `max(high - low, 0.0001)`，方向随 K 线阴阳。
pub fn volume(points: &[PricePoint]) -> Vec<HistogramBar> {
    points
        .iter()
        .map(|p| HistogramBar {
            value: p.range().max(MIN_BAR),
            bullish: p.is_bullish(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_floor_and_direction() {
        let bars = volume(&[
            PricePoint::new(1, 1.0, 1.5, 0.5, 1.2),
            PricePoint::flat(2, 1.0),
            PricePoint::new(3, 2.0, 2.0, 1.0, 1.5),
        ]);
        assert_eq!(bars[0].value, 1.0);
        assert!(bars[0].bullish);
        assert_eq!(bars[1].value, MIN_BAR);
        assert!(bars[1].bullish);
        assert!(!bars[2].bullish);
    }
}
