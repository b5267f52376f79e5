use kasen_core::drawing::entity::{Annotation, DomainPoint, PixelPoint, Tool};
use kasen_core::drawing::port::CoordinateMapper;

use crate::geometry::{arrow_head, channel_offset, ray_end};
use crate::shape::{HANDLE_RADIUS, SELECTED_STROKE, Shape, ShapeKind, ShapeStyle};
use crate::state::Draft;

pub const FIB_LEVELS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];
pub const DRAFT_OWNER: &str = "draft";

const ARROW_HEAD_LEN: f64 = 10.0;
const FIB_FILL: &str = "rgba(79,70,229,0.08)";
const FIB_BORDER: &str = "rgba(79,70,229,0.35)";
const CHANNEL_FILL: &str = "rgba(34,197,94,0.08)";
const CHANNEL_BORDER: &str = "rgba(34,197,94,0.4)";
const LABEL_FILL: &str = "rgba(255,255,255,0.8)";
const LABEL_BORDER: &str = "#e2e8f0";
const PLACEHOLDER_TEXT: &str = "Text";

/// # Summary
/// 生成全部标注与草稿的渲染指令。
///
/// # Logic
/// 1. 已提交标注按存储顺序输出，选中的标注高亮并附带控制点。
/// 2. 草稿追加实时预览点后以虚线输出，排在最后。
/// 3. 点数不足以成形的工具不输出任何图元。
pub fn render<M: CoordinateMapper + ?Sized>(
    annotations: &[Annotation],
    draft: Option<&Draft>,
    selection: Option<&str>,
    mapper: &M,
) -> Vec<Shape> {
    let mut out = Vec::new();
    for a in annotations {
        let selected = selection == Some(a.id.as_str());
        let ctx = Ctx {
            owner: &a.id,
            tool: a.tool,
            text: a.text.as_deref(),
            draft: false,
            selected,
        };
        ctx.emit(&a.points, mapper, &mut out);
    }
    if let Some(d) = draft {
        let mut points = d.points.clone();
        points.extend(d.preview);
        let ctx = Ctx {
            owner: DRAFT_OWNER,
            tool: d.tool,
            text: None,
            draft: true,
            selected: false,
        };
        ctx.emit(&points, mapper, &mut out);
    }
    out
}

struct Ctx<'a> {
    owner: &'a str,
    tool: Tool,
    text: Option<&'a str>,
    draft: bool,
    selected: bool,
}

impl Ctx<'_> {
    fn style(&self) -> ShapeStyle {
        ShapeStyle::for_state(self.draft, self.selected)
    }

    fn push(&self, out: &mut Vec<Shape>, kind: ShapeKind, style: ShapeStyle) {
        out.push(Shape::new(self.owner, kind, style));
    }

    fn segment(&self, out: &mut Vec<Shape>, from: PixelPoint, to: PixelPoint) {
        self.push(out, ShapeKind::Segment { from, to }, self.style());
    }

    fn handles(&self, out: &mut Vec<Shape>, points: &[PixelPoint]) {
        if !self.selected {
            return;
        }
        for at in points {
            self.push(
                out,
                ShapeKind::Handle {
                    at: *at,
                    radius: HANDLE_RADIUS,
                },
                self.style().with_fill(SELECTED_STROKE),
            );
        }
    }

    fn emit<M: CoordinateMapper + ?Sized>(
        &self,
        points: &[DomainPoint],
        mapper: &M,
        out: &mut Vec<Shape>,
    ) {
        let px: Vec<PixelPoint> = points.iter().map(|p| mapper.to_pixel(*p)).collect();
        match (self.tool, px.as_slice()) {
            (Tool::Line, [a, b, ..]) => {
                self.segment(out, *a, *b);
                self.handles(out, &[*a, *b]);
            }
            (Tool::Ray, [a, b, ..]) => {
                self.segment(out, *a, ray_end(*a, *b, mapper.width()));
                self.handles(out, &[*a, *b]);
            }
            (Tool::Hline, [a, ..]) => {
                self.segment(out, PixelPoint::new(0.0, a.y), PixelPoint::new(mapper.width(), a.y));
                self.handles(out, &[*a]);
            }
            (Tool::Vline, [a, ..]) => {
                self.segment(out, PixelPoint::new(a.x, 0.0), PixelPoint::new(a.x, mapper.height()));
                self.handles(out, &[*a]);
            }
            (Tool::Rectangle, [a, b, ..]) => {
                let origin = PixelPoint::new(a.x.min(b.x), a.y.min(b.y));
                let (w, h) = ((b.x - a.x).abs(), (b.y - a.y).abs());
                let rect = ShapeKind::Rect {
                    origin,
                    width: w,
                    height: h,
                };
                self.push(out, rect, self.style());
                self.handles(
                    out,
                    &[
                        origin,
                        PixelPoint::new(origin.x + w, origin.y),
                        PixelPoint::new(origin.x, origin.y + h),
                        PixelPoint::new(origin.x + w, origin.y + h),
                    ],
                );
            }
            (Tool::Fib, [_, _, ..]) => self.fib(points[0], points[1], mapper, out),
            (Tool::Channel, [a, b, rest @ ..]) => {
                let c = rest.first().copied().unwrap_or(*b);
                let off = channel_offset(*a, *b, c);
                let a2 = PixelPoint::new(a.x + off.x, a.y + off.y);
                let b2 = PixelPoint::new(b.x + off.x, b.y + off.y);
                self.push(
                    out,
                    ShapeKind::Polygon {
                        points: vec![*a, *b, b2, a2],
                    },
                    self.style().with_stroke(CHANNEL_BORDER).with_fill(CHANNEL_FILL),
                );
                self.segment(out, *a, *b);
                self.segment(out, a2, b2);
                self.handles(out, &[*a, *b, a2, b2]);
            }
            (Tool::Brush, [first, .., last]) => {
                self.push(out, ShapeKind::Polyline { points: px.clone() }, self.style());
                self.handles(out, &[*first, *last]);
            }
            (Tool::Arrow, [a, b, ..]) => {
                let (h1, h2) = arrow_head(*a, *b, ARROW_HEAD_LEN);
                self.segment(out, *a, *b);
                self.segment(out, *b, h1);
                self.segment(out, *b, h2);
                self.handles(out, &[*a, *b]);
            }
            (Tool::Text | Tool::Label, [a, ..]) => self.glyph(*a, out),
            _ => {}
        }
    }

    // 各档位价格在两锚点价格间线性插值，水平线覆盖两锚点的时间区间
    fn fib<M: CoordinateMapper + ?Sized>(
        &self,
        a: DomainPoint,
        b: DomainPoint,
        mapper: &M,
        out: &mut Vec<Shape>,
    ) {
        let pa = mapper.to_pixel(a);
        let pb = mapper.to_pixel(b);
        let (left, right) = (pa.x.min(pb.x), pa.x.max(pb.x));
        let diff = b.price - a.price;
        // 档位线不随选中高亮
        let level_style = ShapeStyle {
            selected: self.selected,
            ..ShapeStyle::for_state(self.draft, false)
        };

        for level in FIB_LEVELS {
            let y = mapper.to_pixel(DomainPoint::new(a.time, a.price + diff * level)).y;
            self.push(
                out,
                ShapeKind::Segment {
                    from: PixelPoint::new(left, y),
                    to: PixelPoint::new(right, y),
                },
                level_style.clone(),
            );
            self.push(
                out,
                ShapeKind::Text {
                    at: PixelPoint::new(right + 4.0, y + 3.0),
                    text: format!("{:.1}%", level * 100.0),
                },
                level_style.clone(),
            );
        }

        let rect = ShapeKind::Rect {
            origin: PixelPoint::new(left, pa.y.min(pb.y)),
            width: right - left,
            height: (pa.y - pb.y).abs(),
        };
        self.push(
            out,
            rect,
            self.style().with_stroke(FIB_BORDER).with_fill(FIB_FILL),
        );
        self.handles(out, &[PixelPoint::new(left, pa.y), PixelPoint::new(right, pb.y)]);
    }

    fn glyph(&self, a: PixelPoint, out: &mut Vec<Shape>) {
        if self.tool == Tool::Label {
            let chars = self.text.map_or(4, |t| t.chars().count());
            let width = (chars as f64 * 7.0).max(40.0);
            self.push(
                out,
                ShapeKind::Rect {
                    origin: PixelPoint::new(a.x - 4.0, a.y - 14.0),
                    width,
                    height: 18.0,
                },
                self.style().with_stroke(LABEL_BORDER).with_fill(LABEL_FILL),
            );
        }
        let text = self
            .text
            .filter(|t| !t.is_empty())
            .unwrap_or(PLACEHOLDER_TEXT)
            .to_string();
        self.push(out, ShapeKind::Text { at: a, text }, self.style());
        self.handles(out, &[a]);
    }
}
