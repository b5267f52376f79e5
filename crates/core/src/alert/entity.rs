use crate::market::entity::PricePoint;
use serde::{Deserialize, Serialize};

/// 告警条件种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    Above,
    Below,
    IndicatorCross,
}

/// 穿越方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrossDirection {
    #[default]
    Up,
    Down,
}

/// 触发后的提醒方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    #[default]
    Notify,
    Sound,
}

/// # Summary
/// 用户创建的价格告警。
///
/// # Invariants
/// - 一旦 `triggered` 为 true 或已过期，告警即冻结，不再参与求值。
/// - `created_at` 为 Unix 毫秒，`expires` 为分钟数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<CrossDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<u32>,
    pub created_at: i64,
    #[serde(default)]
    pub triggered: bool,
    #[serde(default)]
    pub action: AlertAction,
    #[serde(default)]
    pub note: String,
    // 触发时的数据点时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<i64>,
    // 触发时的收盘价
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
}

impl Alert {
    /// 价格阈值告警（above / below）。
    pub fn price(id: impl Into<String>, kind: AlertKind, price: f64, created_at: i64) -> Self {
        Self {
            id: id.into(),
            kind,
            price: Some(price),
            indicator_value: None,
            indicator_label: None,
            direction: None,
            expires: None,
            created_at,
            triggered: false,
            action: AlertAction::Notify,
            note: String::new(),
            triggered_at: None,
            last_price: None,
        }
    }

    /// 指标穿越告警。
    pub fn indicator_cross(
        id: impl Into<String>,
        value: f64,
        direction: CrossDirection,
        created_at: i64,
    ) -> Self {
        Self {
            kind: AlertKind::IndicatorCross,
            price: None,
            indicator_value: Some(value),
            indicator_label: Some("Indicator".to_string()),
            direction: Some(direction),
            ..Self::price(id, AlertKind::IndicatorCross, 0.0, created_at)
        }
    }

    pub fn with_expiry(mut self, minutes: u32) -> Self {
        self.expires = Some(minutes);
        self
    }

    /// # Summary
    /// 判断告警在给定时刻是否已过期。
    ///
    /// # Logic
    /// `now_ms > created_at + expires * 60000` 即过期；未设置 `expires` 永不过期。
    /// 截止时间溢出 `i64` 时视为永不过期。
    pub fn is_expired(&self, now_ms: i64) -> bool {
        let Some(minutes) = self.expires else {
            return false;
        };
        self.created_at
            .checked_add(i64::from(minutes) * 60_000)
            .is_some_and(|deadline| now_ms > deadline)
    }

    /// # Summary
    /// 判断数据点是否满足告警条件（不考虑触发与过期状态）。
    ///
    /// # Logic
    /// 1. above: `close >= price`；below: `close <= price`。
    /// 2. 指标穿越以开盘价作为 tick 前参考：向上要求 `close >= v && open <= v`，
    ///    向下对称。
    /// 3. 缺失的可选字段令对应分支不成立。
    pub fn matches(&self, point: &PricePoint) -> bool {
        let close = point.close;
        match self.kind {
            AlertKind::Above => self.price.is_some_and(|p| close >= p),
            AlertKind::Below => self.price.is_some_and(|p| close <= p),
            AlertKind::IndicatorCross => {
                let Some(v) = self.indicator_value else {
                    return false;
                };
                match self.direction.unwrap_or_default() {
                    CrossDirection::Up => close >= v && point.open <= v,
                    CrossDirection::Down => close <= v && point.open >= v,
                }
            }
        }
    }
}

/// 告警触发事件，每个告警在其生命周期内至多产生一次。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertTriggered {
    pub alert: Alert,
    pub point: PricePoint,
}
