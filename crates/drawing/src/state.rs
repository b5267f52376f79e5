use kasen_core::config::DrawingConfig;
use kasen_core::drawing::entity::{Annotation, DomainPoint, PixelPoint, Tool};
use kasen_core::drawing::port::CoordinateMapper;
use tracing::debug;
use uuid::Uuid;

use crate::hit::{HitTolerance, hit_test};
use crate::render::render;
use crate::shape::Shape;

// 按下与松开的位移小于该值视为单击，不额外采点
const CLICK_SLOP: f64 = 2.0;

/// 交互事件，由宿主的指针 / 键盘 / 工具栏事件转换而来。
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingEvent {
    SelectTool(Option<Tool>),
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    Delete,
    Clear,
    Undo,
    Cancel,
    SetText(String),
    SetVisible(bool),
}

/// # Summary
/// 绘制中的草稿，全局至多一个。
///
/// # Invariants
/// - 非画笔工具的 `points` 数量始终小于工具要求的点数。
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub tool: Tool,
    pub points: Vec<DomainPoint>,
    // 跟随指针的实时预览点
    pub preview: Option<DomainPoint>,
    // 开始草稿的按下位置，首次松开后清空
    pub(crate) pressed_at: Option<PixelPoint>,
}

#[derive(Debug, Clone, PartialEq)]
struct DragState {
    id: String,
    anchor: DomainPoint,
    original: Vec<DomainPoint>,
    moved: bool,
}

/// # Summary
/// 单次状态转移的结果，宿主据此决定是否持久化与重绘。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    // 已提交标注集合发生变化，需要持久化
    pub store_changed: bool,
    // 本次新提交的标注 id
    pub committed: Option<String>,
    pub redraw: bool,
}

impl Transition {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn changed() -> Self {
        Self {
            store_changed: true,
            redraw: true,
            committed: None,
        }
    }
}

/// # Summary
/// 绘图交互状态机。
///
/// # Invariants
/// - `reduce` 不执行任何 IO，持久化由调用方依据 `Transition` 完成。
/// - 已提交的标注均满足工具要求的点数，部分点序列只存在于草稿中。
/// - 指针坐标无法换算时静默中止当前操作，不提交任何部分状态。
#[derive(Debug, Clone)]
pub struct DrawingState {
    annotations: Vec<Annotation>,
    active_tool: Option<Tool>,
    draft: Option<Draft>,
    selection: Option<String>,
    drag: Option<DragState>,
    visible: bool,
    // 下一个文字 / 标签标注使用的文本
    pending_text: Option<String>,
    settings: DrawingConfig,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self::new(DrawingConfig::default())
    }
}

impl DrawingState {
    pub fn new(settings: DrawingConfig) -> Self {
        Self {
            annotations: Vec::new(),
            active_tool: None,
            draft: None,
            selection: None,
            drag: None,
            visible: true,
            pending_text: None,
            settings,
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.active_tool
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// 整体替换标注集合（切换图表键时调用），同时丢弃草稿、拖拽与选中。
    pub fn replace_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
        self.draft = None;
        self.drag = None;
        self.selection = None;
    }

    pub fn hit_test<M: CoordinateMapper + ?Sized>(
        &self,
        x: f64,
        y: f64,
        mapper: &M,
    ) -> Option<&Annotation> {
        let tolerance = HitTolerance::from(&self.settings);
        hit_test(&self.annotations, PixelPoint::new(x, y), mapper, &tolerance)
    }

    /// 当前全部渲染指令；隐藏时为空。
    pub fn render<M: CoordinateMapper + ?Sized>(&self, mapper: &M) -> Vec<Shape> {
        if !self.visible {
            return Vec::new();
        }
        render(
            &self.annotations,
            self.draft.as_ref(),
            self.selection.as_deref(),
            mapper,
        )
    }

    /// # Summary
    /// 状态机主入口：应用单个事件。
    ///
    /// # Logic
    /// 1. 工具切换丢弃草稿。
    /// 2. 无工具时按下指针执行命中判定，命中即选中并开始拖拽。
    /// 3. 有工具时按下开始草稿，松开追加点，点数达到要求即提交。
    /// 4. 画笔在移动中按最小像素间距采样，松开即提交。
    /// 5. 隐藏状态下忽略指针事件，但松开仍会结束拖拽。
    ///
    /// # Returns
    /// 描述本次变化的 `Transition`。
    pub fn reduce<M: CoordinateMapper + ?Sized>(
        &mut self,
        event: DrawingEvent,
        mapper: &M,
    ) -> Transition {
        match event {
            DrawingEvent::SelectTool(tool) => {
                self.active_tool = tool;
                self.draft = None;
                self.drag = None;
                Transition::redraw()
            }
            DrawingEvent::PointerDown { x, y } if self.visible => self.pointer_down(x, y, mapper),
            DrawingEvent::PointerMove { x, y } if self.visible => self.pointer_move(x, y, mapper),
            DrawingEvent::PointerUp { x, y } => {
                if let Some(drag) = self.drag.take() {
                    return if drag.moved {
                        Transition::changed()
                    } else {
                        Transition::default()
                    };
                }
                if self.visible {
                    self.pointer_up(x, y, mapper)
                } else {
                    Transition::default()
                }
            }
            DrawingEvent::PointerDown { .. } | DrawingEvent::PointerMove { .. } => {
                Transition::default()
            }
            DrawingEvent::Delete => {
                let Some(id) = self.selection.take() else {
                    return Transition::default();
                };
                self.drag = None;
                let before = self.annotations.len();
                self.annotations.retain(|a| a.id != id);
                if self.annotations.len() == before {
                    return Transition::redraw();
                }
                debug!("Deleted annotation {}", id);
                Transition::changed()
            }
            DrawingEvent::Clear => {
                let had_any = !self.annotations.is_empty();
                self.annotations.clear();
                self.draft = None;
                self.drag = None;
                self.selection = None;
                if had_any {
                    Transition::changed()
                } else {
                    Transition::redraw()
                }
            }
            DrawingEvent::Undo => {
                let Some(last) = self.annotations.pop() else {
                    return Transition::default();
                };
                if self.selection.as_deref() == Some(last.id.as_str()) {
                    self.selection = None;
                }
                if self.drag.as_ref().is_some_and(|d| d.id == last.id) {
                    self.drag = None;
                }
                debug!("Undid annotation {}", last.id);
                Transition::changed()
            }
            DrawingEvent::Cancel => {
                self.draft = None;
                // 拖拽中取消则还原原始位置
                if let Some(drag) = self.drag.take() {
                    if let Some(a) = self.annotations.iter_mut().find(|a| a.id == drag.id) {
                        a.points = drag.original;
                    }
                }
                Transition::redraw()
            }
            DrawingEvent::SetText(text) => self.set_text(text),
            DrawingEvent::SetVisible(visible) => {
                self.visible = visible;
                if !visible {
                    self.draft = None;
                }
                Transition::redraw()
            }
        }
    }

    fn pointer_down<M: CoordinateMapper + ?Sized>(
        &mut self,
        x: f64,
        y: f64,
        mapper: &M,
    ) -> Transition {
        let Some(tool) = self.active_tool else {
            let hit = self
                .hit_test(x, y, mapper)
                .map(|a| (a.id.clone(), a.points.clone()));
            self.draft = None;
            self.selection = hit.as_ref().map(|(id, _)| id.clone());
            if let (Some((id, original)), Some(anchor)) = (hit, mapper.to_domain(x, y)) {
                self.drag = Some(DragState {
                    id,
                    anchor,
                    original,
                    moved: false,
                });
            }
            return Transition::redraw();
        };

        if self.draft.is_some() {
            return Transition::default();
        }
        let Some(value) = mapper.to_domain(x, y) else {
            return Transition::default();
        };
        self.draft = Some(Draft {
            tool,
            points: vec![value],
            preview: Some(value),
            pressed_at: Some(PixelPoint::new(x, y)),
        });
        Transition::redraw()
    }

    fn pointer_move<M: CoordinateMapper + ?Sized>(
        &mut self,
        x: f64,
        y: f64,
        mapper: &M,
    ) -> Transition {
        let Some(value) = mapper.to_domain(x, y) else {
            return Transition::default();
        };

        if let Some(drag) = self.drag.as_mut() {
            let dt = value.time - drag.anchor.time;
            let dp = value.price - drag.anchor.price;
            let Some(a) = self.annotations.iter_mut().find(|a| a.id == drag.id) else {
                return Transition::default();
            };
            a.points = drag.original.iter().map(|p| p.shifted(dt, dp)).collect();
            drag.moved = true;
            return Transition::redraw();
        }

        let snap = self.settings.snap;
        let min_distance = self.settings.brush_min_distance;
        let Some(draft) = self.draft.as_mut() else {
            return Transition::default();
        };

        if draft.tool.is_freehand() {
            let Some(last) = draft.points.last() else {
                return Transition::default();
            };
            if mapper.to_pixel(*last).distance_to(mapper.to_pixel(value)) < min_distance {
                return Transition::default();
            }
            draft.points.push(value);
            draft.preview = Some(value);
        } else {
            draft.preview = Some(snap_point(snap, draft.tool, value, draft.points.first()));
        }
        Transition::redraw()
    }

    fn pointer_up<M: CoordinateMapper + ?Sized>(
        &mut self,
        x: f64,
        y: f64,
        mapper: &M,
    ) -> Transition {
        let Some(mut draft) = self.draft.take() else {
            return Transition::default();
        };
        let value = mapper.to_domain(x, y);

        let Some(required) = draft.tool.required_points() else {
            draft.points.extend(value);
            return self.commit(draft);
        };

        let Some(value) = value else {
            debug!("Discarding {} draft released outside the chart", draft.tool);
            return Transition::redraw();
        };

        let clicked_in_place = draft
            .pressed_at
            .take()
            .is_some_and(|p| p.distance_to(PixelPoint::new(x, y)) < CLICK_SLOP);
        let snapped = snap_point(self.settings.snap, draft.tool, value, draft.points.first());
        if !clicked_in_place && draft.points.len() < required {
            draft.points.push(snapped);
        }

        if draft.points.len() >= required {
            return self.commit(draft);
        }
        draft.preview = Some(snapped);
        self.draft = Some(draft);
        Transition::redraw()
    }

    fn commit(&mut self, draft: Draft) -> Transition {
        let text = match draft.tool {
            Tool::Text | Tool::Label => self.pending_text.take(),
            _ => None,
        };
        let annotation = Annotation {
            id: Uuid::new_v4().to_string(),
            tool: draft.tool,
            points: draft.points,
            text,
        };
        debug!(
            "Committed {} annotation {} with {} points",
            annotation.tool,
            annotation.id,
            annotation.points.len()
        );
        let id = annotation.id.clone();
        self.annotations.push(annotation);
        Transition {
            committed: Some(id),
            ..Transition::changed()
        }
    }

    // 选中文字类标注时改写其文本，否则作为下一个文字标注的内容
    fn set_text(&mut self, text: String) -> Transition {
        let selected = self.selection.as_deref().and_then(|id| {
            self.annotations
                .iter_mut()
                .find(|a| a.id == id && matches!(a.tool, Tool::Text | Tool::Label))
        });
        match selected {
            Some(a) => {
                a.text = Some(text);
                Transition::changed()
            }
            None => {
                self.pending_text = Some(text);
                Transition::default()
            }
        }
    }
}

/// # Summary
/// 价格吸附：直线类工具的后续点沿用首点价格。
///
/// # Logic
/// 仅当吸附开启、工具属于直线类且已有首点时生效；面积类工具不吸附。
pub fn snap_point(
    enabled: bool,
    tool: Tool,
    value: DomainPoint,
    first: Option<&DomainPoint>,
) -> DomainPoint {
    match first {
        Some(first) if enabled && tool.snaps() => DomainPoint::new(value.time, first.price),
        _ => value,
    }
}
