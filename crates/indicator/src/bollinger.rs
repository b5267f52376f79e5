/// 布林带三条轨线，与输入等长。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bands {
    pub basis: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// # Summary
/// 布林带：窗口均值 ± `mult` 倍总体标准差。
///
/// # Logic
/// 1. 滚动和给出窗口均值。
/// 2. 方差按窗口内 `(x - mean)^2` 的均值计算（总体标准差）。
/// 3. 前 `length - 1` 个位置三条轨线均为 `None`。
pub fn bollinger(values: &[f64], length: usize, mult: f64) -> Bands {
    let mut bands = Bands::default();
    let period = length as f64;
    let mut sum = 0.0;

    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= length {
            sum -= values[i - length];
        }
        if i + 1 < length {
            bands.basis.push(None);
            bands.upper.push(None);
            bands.lower.push(None);
            continue;
        }

        let mean = sum / period;
        let window = &values[i + 1 - length..=i];
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period;
        let stdev = variance.sqrt();

        bands.basis.push(Some(mean));
        bands.upper.push(Some(mean + mult * stdev));
        bands.lower.push(Some(mean - mult * stdev));
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_constant_has_zero_width() {
        let bands = bollinger(&[5.0; 6], 3, 2.0);
        assert_eq!(bands.basis[1], None);
        assert_eq!(bands.basis[2], Some(5.0));
        assert_eq!(bands.upper[5], Some(5.0));
        assert_eq!(bands.lower[5], Some(5.0));
    }

    #[test]
    fn test_bollinger_population_stdev() {
        // 窗口 [1, 3]：均值 2，总体标准差 1
        let bands = bollinger(&[1.0, 3.0], 2, 2.0);
        assert_eq!(bands.basis[1], Some(2.0));
        assert_eq!(bands.upper[1], Some(4.0));
        assert_eq!(bands.lower[1], Some(0.0));
    }
}
