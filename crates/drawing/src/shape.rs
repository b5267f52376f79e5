use kasen_core::drawing::entity::PixelPoint;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STROKE: &str = "#0f172a";
pub const DRAFT_STROKE: &str = "rgba(37,99,235,0.65)";
pub const SELECTED_STROKE: &str = "#2563eb";
// 选中标注的控制点半径
pub const HANDLE_RADIUS: f64 = 4.0;

/// 渲染样式。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    // 草稿以虚线绘制
    pub dashed: bool,
    pub selected: bool,
}

impl ShapeStyle {
    /// 依据草稿 / 选中状态确定描边颜色。
    pub fn for_state(draft: bool, selected: bool) -> Self {
        let stroke = if selected {
            SELECTED_STROKE
        } else if draft {
            DRAFT_STROKE
        } else {
            DEFAULT_STROKE
        };
        Self {
            stroke: stroke.to_string(),
            fill: None,
            dashed: draft,
            selected,
        }
    }

    pub fn with_fill(mut self, fill: &str) -> Self {
        self.fill = Some(fill.to_string());
        self
    }

    pub fn with_stroke(mut self, stroke: &str) -> Self {
        self.stroke = stroke.to_string();
        self
    }
}

/// 几何图元，全部为像素坐标。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeKind {
    Segment {
        from: PixelPoint,
        to: PixelPoint,
    },
    Polyline {
        points: Vec<PixelPoint>,
    },
    // 闭合填充多边形
    Polygon {
        points: Vec<PixelPoint>,
    },
    // 轴对齐矩形，`origin` 为左上角
    Rect {
        origin: PixelPoint,
        width: f64,
        height: f64,
    },
    Text {
        at: PixelPoint,
        text: String,
    },
    // 控制点圆
    Handle {
        at: PixelPoint,
        radius: f64,
    },
}

/// # Summary
/// 单个渲染指令，由宿主图表的绘制层消费。
///
/// # Invariants
/// - `owner` 为所属标注 id，草稿为 `"draft"`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub owner: String,
    #[serde(flatten)]
    pub kind: ShapeKind,
    pub style: ShapeStyle,
}

impl Shape {
    pub fn new(owner: &str, kind: ShapeKind, style: ShapeStyle) -> Self {
        Self {
            owner: owner.to_string(),
            kind,
            style,
        }
    }
}
