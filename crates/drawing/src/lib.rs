//! 图表绘图引擎。
//!
//! 标注以领域坐标（时间, 价格）保存，经 `CoordinateMapper` 投影到像素空间后
//! 进行命中判定与渲染。交互逻辑由纯状态机 `DrawingState` 驱动，
//! 持久化由 `DrawingSession` 负责。

pub mod geometry;
pub mod hit;
pub mod render;
pub mod session;
pub mod shape;
pub mod state;
pub mod viewport;

pub use hit::{HitTolerance, hit_test};
pub use render::render;
pub use session::DrawingSession;
pub use shape::{Shape, ShapeKind, ShapeStyle};
pub use state::{Draft, DrawingEvent, DrawingState, Transition};
pub use viewport::LinearViewport;
