/// # Summary
/// Wilder 平滑相对强弱指数。
///
/// # Logic
/// 1. 下标 `1..=length` 累加涨跌幅，到 `length` 时除以 `length` 得到初始均值。
/// 2. 此后 `avg = (avg * (length - 1) + current) / length`。
/// 3. 平均跌幅恰为 0 时 RS 定义为 100，避免除零。
/// 4. `RSI = 100 - 100 / (1 + RS)`。
///
/// 输出与价格差分对齐：下标 0 恒为 `None`，下标 `1..=length` 仍在累积期，同为 `None`。
pub fn rsi(values: &[f64], length: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let period = length as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..values.len() {
        let change = values[i] - values[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i <= length {
            avg_gain += gain;
            avg_loss += loss;
            if i == length {
                avg_gain /= period;
                avg_loss /= period;
            }
            continue;
        }

        avg_gain = (avg_gain * (period - 1.0) + gain) / period;
        avg_loss = (avg_loss * (period - 1.0) + loss) / period;
        let rs = if avg_loss == 0.0 {
            100.0
        } else {
            avg_gain / avg_loss
        };
        out[i] = Some(100.0 - 100.0 / (1.0 + rs));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_prefix_undefined() {
        let values: Vec<f64> = (0..10_i32).map(f64::from).collect();
        let out = rsi(&values, 3);
        assert!(out[..=3].iter().all(Option::is_none));
        assert!(out[4..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rsi_zero_loss_is_finite() {
        let values: Vec<f64> = (0..20_i32).map(|i| f64::from(i) * 2.0).collect();
        let out = rsi(&values, 5);
        let last = out.last().copied().flatten().unwrap_or(f64::NAN);
        assert!((last - (100.0 - 100.0 / 101.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_balanced_moves_is_fifty() {
        let values = [10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0];
        let out = rsi(&values, 2);
        // 收敛前后都应接近 50 附近的有限值
        for v in out.into_iter().flatten() {
            assert!(v > 0.0 && v < 100.0);
        }
    }
}
