use kasen_core::alert::entity::{Alert, AlertKind, CrossDirection};
use kasen_core::drawing::entity::Annotation;
use kasen_core::indicator::entity::SeriesOutput;
use uuid::Uuid;

/// # Summary
/// 由绘图标注创建价格告警。
///
/// # Logic
/// 取标注最后一个点的价格作为阈值：高于（含等于）最新收盘价为 above，否则为 below。
///
/// # Returns
/// 标注没有任何点时返回 `None`。
pub fn alert_from_annotation(
    annotation: &Annotation,
    last_close: f64,
    created_at: i64,
) -> Option<Alert> {
    let price = annotation.points.last()?.price;
    let kind = if price >= last_close {
        AlertKind::Above
    } else {
        AlertKind::Below
    };
    let mut alert = Alert::price(Uuid::new_v4().to_string(), kind, price, created_at);
    alert.note = format!("{} drawing {}", annotation.tool, annotation.id);
    Some(alert)
}

/// # Summary
/// 由指标序列的最新值创建穿越告警。
///
/// # Logic
/// 指标值在最新收盘价之上时等待向上穿越，否则等待向下穿越。
///
/// # Returns
/// 序列没有已定义样本时返回 `None`。
pub fn alert_from_series(series: &SeriesOutput, last_close: f64, created_at: i64) -> Option<Alert> {
    let value = series.last_value()?;
    let direction = if value >= last_close {
        CrossDirection::Up
    } else {
        CrossDirection::Down
    };
    let mut alert = Alert::indicator_cross(Uuid::new_v4().to_string(), value, direction, created_at);
    alert.indicator_label = Some(series.id.clone());
    Some(alert)
}
