use kasen_core::config::DrawingConfig;
use kasen_core::drawing::entity::{Annotation, PixelPoint, Tool};
use kasen_core::drawing::port::CoordinateMapper;

use crate::geometry::distance_to_segment;

/// 命中判定容差（像素）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTolerance {
    // 线段类容差
    pub line: f64,
    // 点状标记（文字 / 标签 / 箭头）的半径
    pub marker: f64,
}

impl Default for HitTolerance {
    fn default() -> Self {
        Self {
            line: 6.0,
            marker: 9.0,
        }
    }
}

impl From<&DrawingConfig> for HitTolerance {
    fn from(config: &DrawingConfig) -> Self {
        Self {
            line: config.hit_tolerance,
            marker: config.hit_tolerance * config.marker_tolerance_factor,
        }
    }
}

/// # Summary
/// 在像素空间中查找指针位置命中的标注。
///
/// # Logic
/// 1. 由新到旧遍历，最近绘制（最上层）的标注优先。
/// 2. 每个标注的点先经 `mapper` 投影为像素，再按工具类型判定。
/// 3. 所有距离比较均为严格小于。
///
/// # Returns
/// 命中的标注引用，未命中返回 `None`。
pub fn hit_test<'a, M: CoordinateMapper + ?Sized>(
    annotations: &'a [Annotation],
    at: PixelPoint,
    mapper: &M,
    tolerance: &HitTolerance,
) -> Option<&'a Annotation> {
    annotations.iter().rev().find(|a| {
        let pts: Vec<PixelPoint> = a.points.iter().map(|p| mapper.to_pixel(*p)).collect();
        hits(a.tool, &pts, at, tolerance)
    })
}

fn hits(tool: Tool, pts: &[PixelPoint], at: PixelPoint, tol: &HitTolerance) -> bool {
    if tool.is_point_marker() {
        return pts.first().is_some_and(|p| at.distance_to(*p) < tol.marker);
    }
    match tool {
        // 通道只判定基线
        Tool::Line | Tool::Ray | Tool::Channel => match pts {
            [a, b, ..] => distance_to_segment(at, *a, *b) < tol.line,
            _ => false,
        },
        Tool::Brush => pts
            .windows(2)
            .any(|w| distance_to_segment(at, w[0], w[1]) < tol.line),
        Tool::Rectangle => match pts {
            [a, b, ..] => {
                (a.x.min(b.x)..=a.x.max(b.x)).contains(&at.x)
                    && (a.y.min(b.y)..=a.y.max(b.y)).contains(&at.y)
            }
            _ => false,
        },
        Tool::Fib => match pts {
            [a, b, ..] => (a.x.min(b.x)..=a.x.max(b.x)).contains(&at.x),
            _ => false,
        },
        Tool::Hline => pts.first().is_some_and(|p| (at.y - p.y).abs() < tol.line),
        Tool::Vline => pts.first().is_some_and(|p| (at.x - p.x).abs() < tol.line),
        Tool::Text | Tool::Label | Tool::Arrow => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::LinearViewport;
    use kasen_core::drawing::entity::DomainPoint;

    // 1 像素 = 1 秒 = 1 价格单位（价格轴向下翻转）
    fn viewport() -> LinearViewport {
        LinearViewport::new(100.0, 100.0).with_ranges((0.0, 100.0), (0.0, 100.0))
    }

    fn annotation(id: &str, tool: Tool, points: &[(f64, f64)]) -> Annotation {
        Annotation {
            id: id.to_string(),
            tool,
            points: points.iter().map(|(t, p)| DomainPoint::new(*t, *p)).collect(),
            text: None,
        }
    }

    #[test]
    fn test_topmost_wins() {
        let items = vec![
            annotation("under", Tool::Hline, &[(10.0, 50.0)]),
            annotation("over", Tool::Hline, &[(20.0, 51.0)]),
        ];
        let hit = hit_test(&items, PixelPoint::new(30.0, 50.0), &viewport(), &HitTolerance::default());
        assert_eq!(hit.map(|a| a.id.as_str()), Some("over"));
    }

    #[test]
    fn test_threshold_is_strict() {
        let items = vec![annotation("v", Tool::Vline, &[(10.0, 50.0)])];
        let tol = HitTolerance::default();
        assert!(hit_test(&items, PixelPoint::new(15.9, 0.0), &viewport(), &tol).is_some());
        assert!(hit_test(&items, PixelPoint::new(16.0, 0.0), &viewport(), &tol).is_none());
    }

    #[test]
    fn test_fib_uses_x_range_only() {
        let items = vec![annotation("f", Tool::Fib, &[(10.0, 90.0), (30.0, 80.0)])];
        let tol = HitTolerance::default();
        assert!(hit_test(&items, PixelPoint::new(20.0, 95.0), &viewport(), &tol).is_some());
        assert!(hit_test(&items, PixelPoint::new(31.0, 15.0), &viewport(), &tol).is_none());
    }

    #[test]
    fn test_channel_uses_base_segment_only() {
        let items = vec![annotation(
            "c",
            Tool::Channel,
            &[(10.0, 90.0), (50.0, 90.0), (30.0, 60.0)],
        )];
        let tol = HitTolerance::default();
        assert!(hit_test(&items, PixelPoint::new(30.0, 12.0), &viewport(), &tol).is_some());
        assert!(hit_test(&items, PixelPoint::new(30.0, 40.0), &viewport(), &tol).is_none());
    }

    #[test]
    fn test_marker_radius() {
        let items = vec![annotation("t", Tool::Text, &[(50.0, 50.0)])];
        let tol = HitTolerance::default();
        assert!(hit_test(&items, PixelPoint::new(58.0, 50.0), &viewport(), &tol).is_some());
        assert!(hit_test(&items, PixelPoint::new(59.5, 50.0), &viewport(), &tol).is_none());
    }

    #[test]
    fn test_brush_checks_every_segment() {
        let items = vec![annotation(
            "b",
            Tool::Brush,
            &[(0.0, 100.0), (10.0, 100.0), (10.0, 80.0)],
        )];
        let tol = HitTolerance::default();
        assert!(hit_test(&items, PixelPoint::new(12.0, 15.0), &viewport(), &tol).is_some());
    }
}
