/// # Summary
/// 指数移动平均，输入允许存在未定义值。
///
/// # Logic
/// 1. 平滑系数 `k = 2 / (length + 1)`。
/// 2. 以第一个已定义值作为种子（全部未定义时以 0 为种子）。
/// 3. 未定义的输入沿用上一个平滑值，之后 `prev = v * k + prev * (1 - k)`。
///
/// # Returns
/// 与输入等长、每个位置都有值的序列。
pub fn ema_filled(values: &[Option<f64>], length: usize) -> Vec<f64> {
    let k = 2.0 / (length as f64 + 1.0);
    let mut prev = values.iter().flatten().copied().next().unwrap_or(0.0);
    values
        .iter()
        .map(|v| {
            let val = v.unwrap_or(prev);
            prev = val * k + prev * (1.0 - k);
            prev
        })
        .collect()
}

/// # Summary
/// 收盘价序列的指数移动平均。
///
/// # Logic
/// 以首点为种子，EMA 自第一个点起即有定义，没有未定义前缀。
pub fn ema(values: &[f64], length: usize) -> Vec<Option<f64>> {
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    ema_filled(&wrapped, length).into_iter().map(Some).collect()
}
