use crate::ema::{ema, ema_filled};

/// MACD 三条输出线，与输入等长。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MacdLines {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// # Summary
/// 指数平滑异同移动平均。
///
/// # Logic
/// 1. `macd = EMA(fast) - EMA(slow)`，任一 EMA 未定义则该点未定义。
/// 2. 信号线为 macd 的 `EMA(signal)`，计算前以 0 代替未定义位置，
///    但仅在 macd 有定义的位置报告信号值。
/// 3. `histogram = macd - signal`，两者皆有定义时才有值。
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdLines {
    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);

    let macd: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let zero_filled: Vec<Option<f64>> = macd.iter().map(|v| Some(v.unwrap_or(0.0))).collect();
    let signal_raw = ema_filled(&zero_filled, signal);
    let signal: Vec<Option<f64>> = macd
        .iter()
        .zip(signal_raw)
        .map(|(m, s)| m.map(|_| s))
        .collect();

    let histogram = macd
        .iter()
        .zip(&signal)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdLines {
        macd,
        signal,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macd_constant_input_is_flat_zero() {
        let lines = macd(&[3.0; 40], 12, 26, 9);
        for i in 0..40 {
            assert_eq!(lines.macd[i], Some(0.0));
            assert_eq!(lines.signal[i], Some(0.0));
            assert_eq!(lines.histogram[i], Some(0.0));
        }
    }

    #[test]
    fn test_macd_empty_input() {
        let lines = macd(&[], 12, 26, 9);
        assert!(lines.macd.is_empty());
        assert!(lines.histogram.is_empty());
    }
}
