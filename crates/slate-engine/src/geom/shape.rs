use crate::coords::{Rect, Vec2};

use super::Triangles;

/// Read-only view of a 2D shape.
///
/// `points()` is a flat `[x0, y0, x1, y1, ..]` list in drawing order. Its
/// length must be even; the renderer treats an odd length as a contract
/// violation.
pub trait Shape {
    fn points(&self) -> &[f32];

    /// Whether the outline returns to the first point.
    fn is_closed(&self) -> bool;

    /// Axis-aligned bounding box of all points.
    fn bounds(&self) -> Rect;

    fn center(&self) -> Vec2;

    /// Triangulated interior, if the shape can be filled.
    fn triangles(&self) -> Option<&dyn Triangles>;

    #[inline]
    fn point_count(&self) -> usize {
        self.points().len() / 2
    }

    /// Point `i` of the outline. Panics when out of range.
    #[inline]
    fn point(&self, i: usize) -> Vec2 {
        let p = self.points();
        Vec2::new(p[i * 2], p[i * 2 + 1])
    }
}
