use kasen_core::drawing::entity::{DomainPoint, PixelPoint};
use kasen_core::drawing::port::CoordinateMapper;
use kasen_core::market::entity::PricePoint;
use serde::{Deserialize, Serialize};

// 价格轴上下留白比例
const PRICE_PADDING: f64 = 0.05;

/// # Summary
/// 线性视口：时间轴、价格轴均线性映射到像素矩形。
/// 用于无宿主图表的场景（命令行、测试）。
///
/// # Invariants
/// - 像素 y 轴向下增长，价格越高 y 越小。
/// - 映射区域为 `[0, width] × [0, height]`，区域外的像素无法换算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearViewport {
    pub width: f64,
    pub height: f64,
    pub time_min: f64,
    pub time_max: f64,
    pub price_min: f64,
    pub price_max: f64,
}

impl LinearViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            time_min: 0.0,
            time_max: 1.0,
            price_min: 0.0,
            price_max: 1.0,
        }
    }

    pub fn with_ranges(mut self, time: (f64, f64), price: (f64, f64)) -> Self {
        (self.time_min, self.time_max) = time;
        (self.price_min, self.price_max) = price;
        self
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// # Summary
    /// 调整坐标轴以容纳全部数据点，批量替换数据后调用。
    ///
    /// # Logic
    /// 1. 时间轴覆盖首末点；仅一个点时左右各扩 1 秒。
    /// 2. 价格轴覆盖最低价到最高价，再上下各留 5% 空白；无波动时按 1 扩展。
    pub fn fit_content(&mut self, points: &[PricePoint]) {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return;
        };
        let (t0, t1) = (first.time as f64, last.time as f64);
        (self.time_min, self.time_max) = if t1 > t0 { (t0, t1) } else { (t0 - 1.0, t0 + 1.0) };

        let low = points.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
        let high = points.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
        let span = high - low;
        let pad = if span > 0.0 { span * PRICE_PADDING } else { 1.0 };
        self.price_min = low - pad;
        self.price_max = high + pad;
    }

    fn time_span(&self) -> f64 {
        non_zero(self.time_max - self.time_min)
    }

    fn price_span(&self) -> f64 {
        non_zero(self.price_max - self.price_min)
    }
}

fn non_zero(v: f64) -> f64 {
    if v == 0.0 { 1.0 } else { v }
}

impl CoordinateMapper for LinearViewport {
    fn to_domain(&self, x: f64, y: f64) -> Option<DomainPoint> {
        if !(0.0..=self.width).contains(&x) || !(0.0..=self.height).contains(&y) {
            return None;
        }
        let time = self.time_min + x / non_zero(self.width) * self.time_span();
        let price = self.price_max - y / non_zero(self.height) * self.price_span();
        Some(DomainPoint::new(time, price))
    }

    fn to_pixel(&self, point: DomainPoint) -> PixelPoint {
        let x = (point.time - self.time_min) / self.time_span() * self.width;
        let y = (self.price_max - point.price) / self.price_span() * self.height;
        PixelPoint::new(x, y)
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }
}
