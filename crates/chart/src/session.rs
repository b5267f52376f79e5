use kasen_alert::{AlertEvaluator, alert_from_annotation, alert_from_series};
use kasen_core::alert::entity::{Alert, AlertTriggered};
use kasen_core::alert::port::AlertSink;
use kasen_core::common::ChartKey;
use kasen_core::common::time::TimeProvider;
use kasen_core::config::AppConfig;
use kasen_core::indicator::entity::{IndicatorSpec, SeriesOutput};
use kasen_core::market::entity::PricePoint;
use kasen_core::market::error::MarketError;
use kasen_core::store::port::KvStore;
use kasen_drawing::{DrawingEvent, DrawingSession, LinearViewport, Shape, Transition};
use kasen_indicator::{CompareSpec, IndicatorSet, compare_series};
use kasen_market::{PriceHistory, SourceEvent};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::ChartError;

// 触发记录保留条数
const TRIGGERED_LOG_LIMIT: usize = 100;

/// # Summary
/// 图表会话依赖的外部协作方，全部通过 trait 注入。
#[derive(Clone)]
pub struct ChartContext {
    // 绘图持久化
    pub store: Arc<dyn KvStore>,
    // 告警投递
    pub sink: Arc<dyn AlertSink>,
    // 告警过期与创建时间使用的时钟
    pub clock: Arc<dyn TimeProvider>,
}

struct CompareOverlay {
    spec: CompareSpec,
    points: Vec<PricePoint>,
}

/// # Summary
/// 单个图表的应用服务门面。
/// 消费数据生产者的 `SourceEvent`，驱动指标重算与告警求值，并托管绘图会话。
///
/// # Invariants
/// - 价格历史由会话独占，指标与告警只读借用。
/// - 每个新数据点依次经过：入库 → 指标重算 → 告警求值 → 投递。
/// - 乱序数据点被拒绝并记录 warn，不影响后续数据。
/// - 告警簿不随图表键切换而清空。
pub struct ChartSession {
    key: ChartKey,
    history: PriceHistory,
    indicators: IndicatorSet,
    compares: Vec<CompareOverlay>,
    compare_percent: bool,
    alerts: AlertEvaluator,
    // 最近触发的告警，最新的在前
    triggered_log: Vec<AlertTriggered>,
    drawings: DrawingSession,
    viewport: LinearViewport,
    series: Vec<SeriesOutput>,
    sink: Arc<dyn AlertSink>,
    clock: Arc<dyn TimeProvider>,
}

impl ChartSession {
    /// # Summary
    /// 按配置打开图表会话。
    ///
    /// # Logic
    /// 1. 由 `chart.symbol` / `chart.timeframe` 组成图表键。
    /// 2. 按 `chart.buffer_capacity` 创建价格历史。
    /// 3. 载入 `chart.indicators` 中的指标。
    /// 4. 加载该键下保存的绘图。
    ///
    /// # Arguments
    /// * `config`: 应用配置。
    /// * `ctx`: 外部协作方。
    /// * `viewport`: 绘图与命中判定使用的视口。
    pub async fn open(config: &AppConfig, ctx: ChartContext, viewport: LinearViewport) -> Self {
        let key = ChartKey::new(config.chart.symbol.clone(), config.chart.timeframe);
        let drawings =
            DrawingSession::open(ctx.store.clone(), key.clone(), config.drawing.clone()).await;
        info!(
            "Chart session {} opened ({} drawings)",
            key,
            drawings.annotations().len()
        );
        Self {
            key,
            history: PriceHistory::new(config.chart.buffer_capacity),
            indicators: IndicatorSet::from_specs(config.chart.indicators.clone()),
            compares: Vec::new(),
            compare_percent: false,
            alerts: AlertEvaluator::new(ctx.clock.clone()),
            triggered_log: Vec::new(),
            drawings,
            viewport,
            series: Vec::new(),
            sink: ctx.sink,
            clock: ctx.clock,
        }
    }

    pub fn key(&self) -> &ChartKey {
        &self.key
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    /// 最近一次重算得到的全部序列（指标在前，对比叠加在后）。
    pub fn series(&self) -> &[SeriesOutput] {
        &self.series
    }

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.alerts()
    }

    pub fn triggered_log(&self) -> &[AlertTriggered] {
        &self.triggered_log
    }

    pub fn drawings(&self) -> &DrawingSession {
        &self.drawings
    }

    pub fn viewport(&self) -> &LinearViewport {
        &self.viewport
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    /// # Summary
    /// 处理一个生产者事件。
    ///
    /// # Returns
    /// 数据点被接受时返回 `Some(本次新触发的告警)`；
    /// 乱序被拒的点、重置与结束事件返回 `None`。
    pub async fn handle(&mut self, event: SourceEvent) -> Option<Vec<AlertTriggered>> {
        match event {
            SourceEvent::Point(point) => match self.ingest(point).await {
                Ok(fired) => Some(fired),
                Err(e) => {
                    warn!("Point rejected for {}: {}", self.key, e);
                    None
                }
            },
            SourceEvent::Reset(points) => {
                self.reset(points);
                None
            }
            SourceEvent::Ended(kind) => {
                info!("{} source for {} ended", kind, self.key);
                None
            }
        }
    }

    /// # Summary
    /// 追加一个新数据点并跑完整条管线。
    ///
    /// # Logic
    /// 1. 写入价格历史（乱序即返回错误，后续步骤不执行）。
    /// 2. 重算全部指标与对比叠加。
    /// 3. 对该点求值告警，新触发的告警写入触发记录并投递到 sink。
    ///
    /// # Errors
    /// 时间不晚于最新数据点时返回 `MarketError::OutOfOrder`。
    pub async fn ingest(&mut self, point: PricePoint) -> Result<Vec<AlertTriggered>, MarketError> {
        self.history.push(point)?;
        self.recompute();
        let fired = self.alerts.evaluate(&point);
        for event in &fired {
            if let Err(e) = self.sink.deliver(event).await {
                warn!("Alert {} not delivered: {}", event.alert.id, e);
            }
            self.triggered_log.insert(0, event.clone());
        }
        self.triggered_log.truncate(TRIGGERED_LOG_LIMIT);
        Ok(fired)
    }

    /// # Summary
    /// 用一批数据整体替换价格历史（回放起点、批量加载），随后适配视口并重算。
    /// 批量数据不触发告警。
    pub fn reset(&mut self, points: Vec<PricePoint>) {
        let total = points.len();
        let skipped = self.history.replace(points);
        self.viewport.fit_content(&self.history.to_vec());
        self.recompute();
        info!(
            "History for {} reset with {} points ({} skipped)",
            self.key,
            total - skipped,
            skipped
        );
    }

    fn recompute(&mut self) {
        let points = self.history.to_vec();
        let mut series = self.indicators.recompute(&points);
        series.extend(
            self.compares
                .iter()
                .enumerate()
                .map(|(idx, c)| compare_series(&c.spec, idx, &c.points, self.compare_percent)),
        );
        debug!("Recomputed {} series for {}", series.len(), self.key);
        self.series = series;
    }

    /// 新增或原位替换一个指标，并立即重算。
    pub fn upsert_indicator(&mut self, spec: IndicatorSpec) {
        self.indicators.upsert(spec);
        self.recompute();
    }

    /// # Errors
    /// 指标不存在时返回 `IndicatorError::NotFound`。
    pub fn remove_indicator(&mut self, id: &str) -> Result<IndicatorSpec, ChartError> {
        let spec = self.indicators.remove(id)?;
        self.recompute();
        Ok(spec)
    }

    /// # Summary
    /// 设置（或替换）一个对比叠加，`points` 为被对比标的的价格序列。
    pub fn set_compare(&mut self, spec: CompareSpec, points: Vec<PricePoint>) {
        match self.compares.iter_mut().find(|c| c.spec.id == spec.id) {
            Some(existing) => {
                existing.spec = spec;
                existing.points = points;
            }
            None => self.compares.push(CompareOverlay { spec, points }),
        }
        self.recompute();
    }

    pub fn remove_compare(&mut self, id: &str) -> bool {
        let before = self.compares.len();
        self.compares.retain(|c| c.spec.id != id);
        let removed = self.compares.len() < before;
        if removed {
            self.recompute();
        }
        removed
    }

    /// 切换对比叠加的百分比模式。
    pub fn set_compare_percent(&mut self, percent: bool) {
        if self.compare_percent != percent {
            self.compare_percent = percent;
            self.recompute();
        }
    }

    /// # Errors
    /// 告警配置不完整时返回 `AlertError::Invalid`。
    pub fn add_alert(&mut self, alert: Alert) -> Result<(), ChartError> {
        self.alerts.add(alert)?;
        Ok(())
    }

    pub fn remove_alert(&mut self, id: &str) -> Option<Alert> {
        self.alerts.remove(id)
    }

    /// # Summary
    /// 由绘图标注创建价格告警。
    ///
    /// # Returns
    /// 新告警的 id。
    ///
    /// # Errors
    /// - 标注不存在：`ChartError::NotFound`。
    /// - 尚无价格数据：`ChartError::NoData`。
    pub fn alert_from_drawing(&mut self, annotation_id: &str) -> Result<String, ChartError> {
        let last_close = self.last_close()?;
        let annotation = self
            .drawings
            .annotations()
            .iter()
            .find(|a| a.id == annotation_id)
            .ok_or_else(|| ChartError::NotFound(annotation_id.to_string()))?;
        let alert = alert_from_annotation(annotation, last_close, self.clock.now_ms())
            .ok_or_else(|| ChartError::NotFound(annotation_id.to_string()))?;
        let id = alert.id.clone();
        self.alerts.add(alert)?;
        Ok(id)
    }

    /// # Summary
    /// 由指标序列（含子序列，如 `bb-upper`）的最新值创建穿越告警。
    ///
    /// # Errors
    /// 序列不存在或没有已定义样本时返回 `ChartError::NotFound`。
    pub fn alert_from_indicator(&mut self, series_id: &str) -> Result<String, ChartError> {
        let last_close = self.last_close()?;
        let alert = self
            .series
            .iter()
            .find(|s| s.id == series_id)
            .and_then(|s| alert_from_series(s, last_close, self.clock.now_ms()))
            .ok_or_else(|| ChartError::NotFound(series_id.to_string()))?;
        let id = alert.id.clone();
        self.alerts.add(alert)?;
        Ok(id)
    }

    fn last_close(&self) -> Result<f64, ChartError> {
        self.history
            .last()
            .map(|p| p.close)
            .ok_or_else(|| ChartError::NoData(self.key.to_string()))
    }

    /// 以当前视口为坐标映射应用一个绘图交互事件。
    pub async fn dispatch_drawing(&mut self, event: DrawingEvent) -> Transition {
        self.drawings.dispatch(event, &self.viewport).await
    }

    pub fn render_drawings(&self) -> Vec<Shape> {
        self.drawings.render(&self.viewport)
    }

    /// # Summary
    /// 切换到另一个图表键。
    ///
    /// # Logic
    /// 1. 绘图会话保存旧键并加载新键的标注。
    /// 2. 清空价格历史与序列，等待新数据源重置。
    /// 3. 指标、对比叠加与告警簿保留。
    pub async fn switch_key(&mut self, key: ChartKey) {
        if key == self.key {
            return;
        }
        self.drawings.switch_key(key.clone()).await;
        self.history.replace(Vec::new());
        self.series.clear();
        info!("Chart session switched {} -> {}", self.key, key);
        self.key = key;
    }

    /// # Summary
    /// 关闭前把尚未落盘的绘图写回存储。
    ///
    /// # Errors
    /// 写入失败返回 `DrawingError::Persist`。
    pub async fn close(&mut self) -> Result<(), ChartError> {
        if self.drawings.is_dirty() {
            self.drawings.flush().await?;
        }
        info!("Chart session {} closed", self.key);
        Ok(())
    }
}
