use kasen_core::drawing::entity::PixelPoint;
use std::f64::consts::PI;

/// # Summary
/// 点到线段的最短像素距离。
///
/// # Logic
/// 将点投影到线段所在直线，投影参数钳制在 `[0, 1]`，取投影点与原点距离。
/// 退化线段（两端重合）按长度平方为 1 处理，结果即点到端点的距离。
pub fn distance_to_segment(p: PixelPoint, a: PixelPoint, b: PixelPoint) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let mut ab2 = abx * abx + aby * aby;
    if ab2 == 0.0 {
        ab2 = 1.0;
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / ab2).clamp(0.0, 1.0);
    p.distance_to(PixelPoint::new(a.x + abx * t, a.y + aby * t))
}

/// 射线终点：沿两点斜率延伸到右边界，竖直时斜率取 0。
pub fn ray_end(a: PixelPoint, b: PixelPoint, right: f64) -> PixelPoint {
    let dx = b.x - a.x;
    let slope = if dx != 0.0 { (b.y - a.y) / dx } else { 0.0 };
    PixelPoint::new(right, a.y + slope * (right - a.x))
}

/// # Summary
/// 通道平行线的偏移向量。
///
/// # Logic
/// 取基线 `a→b` 的单位法向量，乘以第三点 `c` 到基线的有向垂直距离。
pub fn channel_offset(a: PixelPoint, b: PixelPoint, c: PixelPoint) -> PixelPoint {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut len = dx.hypot(dy);
    if len == 0.0 {
        len = 1.0;
    }
    let ux = -dy / len;
    let uy = dx / len;
    let dist = (c.x - a.x) * ux + (c.y - a.y) * uy;
    PixelPoint::new(ux * dist, uy * dist)
}

/// 箭头两翼端点：自 `b` 反向延伸 `head_len`，偏角 ±30°。
pub fn arrow_head(a: PixelPoint, b: PixelPoint, head_len: f64) -> (PixelPoint, PixelPoint) {
    let angle = (b.y - a.y).atan2(b.x - a.x);
    let wing = |offset: f64| {
        PixelPoint::new(
            b.x - head_len * (angle + offset).cos(),
            b.y - head_len * (angle + offset).sin(),
        )
    };
    (wing(-PI / 6.0), wing(PI / 6.0))
}
