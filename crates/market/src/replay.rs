use kasen_core::config::ReplayConfig;
use kasen_core::market::entity::PricePoint;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::source::{SourceEvent, SourceKind};

/// # Summary
/// 回放参数：倍速与游标。
///
/// # Invariants
/// - 倍速至少为 1；推送间隔为 `1000 / speed` 毫秒。
/// - 游标为 `None` 表示从最后一个数据点开始；越界的游标在使用时收敛到末尾。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySettings {
    pub speed: u32,
    pub cursor: Option<usize>,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            speed: 1,
            cursor: None,
        }
    }
}

impl From<&ReplayConfig> for ReplaySettings {
    fn from(config: &ReplayConfig) -> Self {
        Self {
            speed: config.speed,
            cursor: config.cursor,
        }
    }
}

impl ReplaySettings {
    /// 推送间隔；倍速为 0 时按 1 倍处理。
    pub fn interval(&self) -> Duration {
        let speed = if self.speed > 0 { self.speed } else { 1 };
        Duration::from_millis(1000 / u64::from(speed))
    }

    /// 对给定长度的数据解析实际起始游标。
    pub fn resolve(&self, len: usize) -> Option<usize> {
        let last = len.checked_sub(1)?;
        Some(self.cursor.unwrap_or(last).min(last))
    }

    pub fn faster(self) -> Self {
        Self {
            speed: self.speed.saturating_add(1),
            ..self
        }
    }

    pub fn slower(self) -> Self {
        Self {
            speed: self.speed.saturating_sub(1).max(1),
            ..self
        }
    }

    /// 游标后退一步，`len` 用于解析未设置的游标。
    pub fn step_back(self, len: usize) -> Self {
        Self {
            cursor: Some(self.cursor.unwrap_or(len).saturating_sub(1)),
            ..self
        }
    }

    /// 游标前进一步，未设置时从 0 起算。
    pub fn step_forward(self) -> Self {
        Self {
            cursor: Some(self.cursor.unwrap_or(0).saturating_add(1)),
            ..self
        }
    }

    pub fn to_start(self) -> Self {
        Self {
            cursor: Some(0),
            ..self
        }
    }

    pub fn to_end(self) -> Self {
        Self {
            cursor: Some(usize::MAX),
            ..self
        }
    }
}

/// # Summary
/// 历史回放生产者：先以游标前的数据重置图表，再按固定间隔逐根推送。
///
/// # Invariants
/// - 推送到最后一个数据点后发送 `SourceEvent::Ended` 并结束，不重复推送末尾数据。
/// - 生产者被丢弃时回放协程随之中止。
pub struct ReplayProducer {
    points: Arc<Vec<PricePoint>>,
    settings: ReplaySettings,
    position: Arc<AtomicUsize>,
    task: Option<AbortHandle>,
}

impl ReplayProducer {
    pub fn new(points: Vec<PricePoint>, settings: ReplaySettings) -> Self {
        Self {
            points: Arc::new(points),
            settings,
            position: Arc::new(AtomicUsize::new(0)),
            task: None,
        }
    }

    pub fn settings(&self) -> ReplaySettings {
        self.settings
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 最近一次推送的数据点下标。
    pub fn position(&self) -> usize {
        self.position.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// # Summary
    /// 启动回放协程。
    ///
    /// # Logic
    /// 1. 发送 `Reset`，内容为 `[0, cursor]` 区间的数据点。
    /// 2. 每个间隔推进游标一步并推送对应数据点。
    /// 3. 到达末尾后发送 `Ended`。
    pub fn start(&mut self, tx: mpsc::Sender<SourceEvent>) {
        self.stop();
        let points = self.points.clone();
        let position = self.position.clone();
        let settings = self.settings;

        let handle = tokio::spawn(async move {
            let Some(start) = settings.resolve(points.len()) else {
                if tx.send(SourceEvent::Ended(SourceKind::Replay)).await.is_err() {
                    debug!("Replay consumer gone before end");
                }
                return;
            };
            position.store(start, Ordering::SeqCst);
            info!(
                "Replay starting at {}/{} every {:?}",
                start,
                points.len(),
                settings.interval()
            );
            if tx
                .send(SourceEvent::Reset(points[..=start].to_vec()))
                .await
                .is_err()
            {
                return;
            }

            let mut ticker = tokio::time::interval(settings.interval());
            // 首个 tick 立即完成
            ticker.tick().await;
            for (idx, point) in points.iter().enumerate().skip(start + 1) {
                ticker.tick().await;
                position.store(idx, Ordering::SeqCst);
                if tx.send(SourceEvent::Point(*point)).await.is_err() {
                    debug!("Replay consumer gone at {}", idx);
                    return;
                }
            }
            info!("Replay reached the last point");
            if tx.send(SourceEvent::Ended(SourceKind::Replay)).await.is_err() {
                debug!("Replay consumer gone before end");
            }
        });
        self.task = Some(handle.abort_handle());
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ReplayProducer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_speed() {
        let mut s = ReplaySettings::default();
        assert_eq!(s.interval(), Duration::from_millis(1000));
        s.speed = 4;
        assert_eq!(s.interval(), Duration::from_millis(250));
        s.speed = 0;
        assert_eq!(s.interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_cursor_controls() {
        let s = ReplaySettings::default();
        assert_eq!(s.resolve(10), Some(9));
        assert_eq!(s.resolve(0), None);
        assert_eq!(s.step_back(10).cursor, Some(9));
        assert_eq!(s.step_forward().cursor, Some(1));
        assert_eq!(s.to_end().resolve(10), Some(9));
        assert_eq!(s.to_start().step_back(10).cursor, Some(0));
        assert_eq!(s.slower().speed, 1);
        assert_eq!(s.faster().faster().speed, 3);
    }
}
