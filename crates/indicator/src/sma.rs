/// # Summary
/// 简单移动平均。
///
/// # Logic
/// 维护窗口滚动和：加入新值、减去离开窗口的旧值，每个点 O(1) 更新。
/// 前 `length - 1` 个位置历史不足，输出 `None`。
///
/// # Arguments
/// * `values`: 输入序列（通常为收盘价）。
/// * `length`: 窗口长度，调用方保证大于 0。
pub fn sma(values: &[f64], length: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= length {
            sum -= values[i - length];
        }
        if i + 1 >= length {
            out.push(Some(sum / length as f64));
        } else {
            out.push(None);
        }
    }
    out
}
