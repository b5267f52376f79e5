use crate::drawing::entity::{DomainPoint, PixelPoint};

/// # Summary
/// 像素坐标与领域坐标（时间, 价格）之间的双向映射，由宿主图表视口提供。
///
/// # Invariants
/// - 映射反映视口当前的缩放与平移状态，调用方不得缓存换算结果。
/// - `to_domain` 对视口映射区域之外的像素返回 `None`。
pub trait CoordinateMapper {
    /// # Summary
    /// 像素坐标转领域坐标。
    ///
    /// # Arguments
    /// * `x`, `y`: 相对图表左上角的像素坐标。
    ///
    /// # Returns
    /// 位于映射区域内返回领域坐标，否则返回 `None`。
    fn to_domain(&self, x: f64, y: f64) -> Option<DomainPoint>;

    /// 领域坐标转像素坐标。
    fn to_pixel(&self, point: DomainPoint) -> PixelPoint;

    /// 绘图面板宽度（像素）。
    fn width(&self) -> f64;

    /// 绘图面板高度（像素）。
    fn height(&self) -> f64;
}
