use kasen_core::market::entity::PricePoint;
use kasen_core::market::error::MarketError;
use serde_json::Value;

// i64 可精确表示的秒级时间范围
const MAX_TIME: f64 = 9.0e15;

/// # Summary
/// 把原始行情报文解码为数据点。
///
/// # Logic
/// 1. `time` / `open` / `high` / `low` / `close` 均接受数值或数值字符串。
/// 2. 任一字段缺失、无法解析或非有限值即判定为非法报文。
/// 3. `time` 向下取整到整秒。
///
/// # Errors
/// 非法报文返回 `MarketError::Parse`，调用方记录后丢弃。
pub fn decode_tick(raw: &Value) -> Result<PricePoint, MarketError> {
    let time = field(raw, "time")?;
    Ok(PricePoint {
        time: floor_seconds(time)?,
        open: field(raw, "open")?,
        high: field(raw, "high")?,
        low: field(raw, "low")?,
        close: field(raw, "close")?,
    })
}

fn field(raw: &Value, name: &str) -> Result<f64, MarketError> {
    let value = match raw.get(name) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(MarketError::Parse(format!(
            "field `{}` is missing or not a finite number: {}",
            name,
            raw.get(name).unwrap_or(&Value::Null)
        ))),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn floor_seconds(time: f64) -> Result<i64, MarketError> {
    let floored = time.floor();
    if floored.abs() > MAX_TIME {
        return Err(MarketError::Parse(format!("time out of range: {}", time)));
    }
    // 已做范围检查
    Ok(floored as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_numbers_and_strings() {
        let point = decode_tick(&json!({
            "time": 1_700_000_000.9,
            "open": "1.1",
            "high": 1.2,
            "low": " 1.0 ",
            "close": 1.15
        }))
        .unwrap();
        assert_eq!(point, PricePoint::new(1_700_000_000, 1.1, 1.2, 1.0, 1.15));
    }

    #[test]
    fn test_missing_field_rejected() {
        let err = decode_tick(&json!({"time": 1, "open": 1, "high": 1, "low": 1}));
        assert!(matches!(err, Err(MarketError::Parse(_))));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let raw = json!({"time": 1, "open": "abc", "high": 1, "low": 1, "close": 1});
        assert!(decode_tick(&raw).is_err());
        let raw = json!({"time": 1, "open": "NaN", "high": 1, "low": 1, "close": 1});
        assert!(decode_tick(&raw).is_err());
        let raw = json!({"time": 1, "open": 1, "high": 1, "low": 1, "close": "inf"});
        assert!(decode_tick(&raw).is_err());
    }
}
