use serde::{Deserialize, Serialize};

/// # Summary
/// 绘图工具种类。`trendline` 作为 `line` 的别名接受。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[serde(alias = "trendline")]
    Line,
    Ray,
    Hline,
    Vline,
    Rectangle,
    Fib,
    Channel,
    Brush,
    Arrow,
    Text,
    Label,
}

impl Tool {
    /// # Summary
    /// 标注完成所需的点数。
    ///
    /// # Returns
    /// 自由画笔返回 `None`（无固定点数，松开指针即提交）。
    pub fn required_points(&self) -> Option<usize> {
        match self {
            Tool::Hline | Tool::Vline | Tool::Text | Tool::Label => Some(1),
            Tool::Line | Tool::Ray | Tool::Rectangle | Tool::Fib | Tool::Arrow => Some(2),
            Tool::Channel => Some(3),
            Tool::Brush => None,
        }
    }

    pub fn is_freehand(&self) -> bool {
        self.required_points().is_none()
    }

    /// 吸附时复用首点价格的直线类工具。
    pub fn snaps(&self) -> bool {
        matches!(self, Tool::Line | Tool::Ray | Tool::Arrow)
    }

    /// 以首点作为点状标记进行命中判定的工具。
    pub fn is_point_marker(&self) -> bool {
        matches!(self, Tool::Text | Tool::Label | Tool::Arrow)
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tool::Line => "line",
            Tool::Ray => "ray",
            Tool::Hline => "hline",
            Tool::Vline => "vline",
            Tool::Rectangle => "rectangle",
            Tool::Fib => "fib",
            Tool::Channel => "channel",
            Tool::Brush => "brush",
            Tool::Arrow => "arrow",
            Tool::Text => "text",
            Tool::Label => "label",
        };
        f.write_str(name)
    }
}

/// 领域坐标点：时间（Unix 秒，可为小数）与价格。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainPoint {
    pub time: f64,
    pub price: f64,
}

impl DomainPoint {
    pub fn new(time: f64, price: f64) -> Self {
        Self { time, price }
    }

    /// 按时间差与价格差平移。
    pub fn shifted(&self, dt: f64, dp: f64) -> Self {
        Self {
            time: self.time + dt,
            price: self.price + dp,
        }
    }
}

/// 像素坐标点。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// # Summary
/// 已提交的图表标注。
///
/// # Invariants
/// - `points` 以领域坐标保存，缩放 / 平移 / 尺寸变化后依然有效。
/// - 非画笔工具的点数等于 `tool.required_points()`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    pub tool: Tool,
    pub points: Vec<DomainPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Annotation {
    /// 点数是否满足工具要求；画笔至少需要一个采样点。
    pub fn is_complete(&self) -> bool {
        match self.tool.required_points() {
            Some(n) => self.points.len() >= n,
            None => !self.points.is_empty(),
        }
    }
}
