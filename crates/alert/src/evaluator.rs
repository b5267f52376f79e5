use kasen_core::alert::entity::{Alert, AlertKind, AlertTriggered};
use kasen_core::alert::error::AlertError;
use kasen_core::common::time::TimeProvider;
use kasen_core::market::entity::PricePoint;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// # Summary
/// 告警簿与求值器：保存用户告警，对每个新数据点求值。
///
/// # Invariants
/// - 每个告警在生命周期内至多触发一次；已触发 id 记录在集合中，不再参与求值。
/// - 过期判定通过注入的 `TimeProvider` 取当前时间，不直接读取系统时钟。
pub struct AlertEvaluator {
    alerts: Vec<Alert>,
    // 已触发告警 id
    triggered: HashSet<String>,
    clock: Arc<dyn TimeProvider>,
}

impl AlertEvaluator {
    pub fn new(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            alerts: Vec::new(),
            triggered: HashSet::new(),
            clock,
        }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// 尚未触发且未过期的告警数量。
    pub fn pending(&self) -> usize {
        let now = self.clock.now_ms();
        self.alerts
            .iter()
            .filter(|a| !self.triggered.contains(&a.id) && !a.is_expired(now))
            .count()
    }

    /// # Summary
    /// 整体替换告警列表。
    ///
    /// # Logic
    /// 已标记 `triggered` 的告警直接进入已触发集合，保证重新加载后不会二次触发。
    pub fn replace_alerts(&mut self, alerts: Vec<Alert>) {
        self.triggered = alerts
            .iter()
            .filter(|a| a.triggered)
            .map(|a| a.id.clone())
            .collect();
        self.alerts = alerts;
    }

    /// # Summary
    /// 新增（或按 id 替换）一条告警。
    ///
    /// # Errors
    /// 条件字段缺失或非有限值时返回 `AlertError::Invalid`。
    pub fn add(&mut self, alert: Alert) -> Result<(), AlertError> {
        validate(&alert)?;
        if alert.triggered {
            self.triggered.insert(alert.id.clone());
        } else {
            self.triggered.remove(&alert.id);
        }
        match self.alerts.iter_mut().find(|a| a.id == alert.id) {
            Some(existing) => *existing = alert,
            None => self.alerts.push(alert),
        }
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<Alert> {
        let pos = self.alerts.iter().position(|a| a.id == id)?;
        self.triggered.remove(id);
        Some(self.alerts.remove(pos))
    }

    /// # Summary
    /// 对新数据点求值全部告警。
    ///
    /// # Logic
    /// 1. 跳过已触发与已过期的告警。
    /// 2. 条件成立时记录 `triggered`、触发时间（数据点时间）与触发价（收盘价）。
    /// 3. 把 id 加入已触发集合。
    ///
    /// # Returns
    /// 本次新触发的事件，按告警创建顺序排列。
    pub fn evaluate(&mut self, point: &PricePoint) -> Vec<AlertTriggered> {
        let now = self.clock.now_ms();
        let mut fired = Vec::new();
        for alert in &mut self.alerts {
            if alert.triggered || self.triggered.contains(&alert.id) {
                continue;
            }
            if alert.is_expired(now) {
                continue;
            }
            if !alert.matches(point) {
                continue;
            }
            alert.triggered = true;
            alert.triggered_at = Some(point.time);
            alert.last_price = Some(point.close);
            self.triggered.insert(alert.id.clone());
            info!(
                "Alert {} ({:?}) triggered at {} close {}",
                alert.id, alert.kind, point.time, point.close
            );
            fired.push(AlertTriggered {
                alert: alert.clone(),
                point: *point,
            });
        }
        if !fired.is_empty() {
            debug!("{} alerts fired at {}", fired.len(), point.time);
        }
        fired
    }
}

fn validate(alert: &Alert) -> Result<(), AlertError> {
    let (field, value) = match alert.kind {
        AlertKind::Above | AlertKind::Below => ("price", alert.price),
        AlertKind::IndicatorCross => ("indicatorValue", alert.indicator_value),
    };
    match value {
        Some(v) if v.is_finite() => Ok(()),
        _ => Err(AlertError::Invalid {
            id: alert.id.clone(),
            reason: format!("{} must be a finite number", field),
        }),
    }
}
