use std::cell::OnceCell;
use std::f32::consts::TAU;

use crate::coords::{Rect, Vec2};

use super::{tessellate, GeomError, Shape, TriangleList, Triangles};

/// Owned polygon shape.
///
/// Bounds and center are computed at construction. The triangulation is
/// computed on first use and cached; a precomputed one can be supplied with
/// [`Polygon::with_triangulation`].
#[derive(Debug, Clone)]
pub struct Polygon {
    points: Vec<f32>,
    closed: bool,
    bounds: Rect,
    center: Vec2,
    triangles: OnceCell<Option<TriangleList>>,
}

impl Polygon {
    /// Closed polygon from a flat `[x0, y0, x1, y1, ..]` coordinate list.
    pub fn new(points: Vec<f32>) -> Result<Self, GeomError> {
        if !points.len().is_multiple_of(2) {
            return Err(GeomError::OddCoordinateCount(points.len()));
        }
        if let Some(index) = points.iter().position(|c| !c.is_finite()) {
            return Err(GeomError::NonFinite { index });
        }
        Ok(Self::from_flat(points, true))
    }

    /// Closed polygon from a point list.
    pub fn from_points(points: &[Vec2]) -> Result<Self, GeomError> {
        Self::new(points.iter().flat_map(|p| p.to_array()).collect())
    }

    /// Closed four-point polygon, corners clockwise from the top-left (+Y down).
    ///
    /// Coordinates are not validated.
    pub fn rect(rect: Rect) -> Self {
        let Vec2 { x: x0, y: y0 } = rect.min();
        let Vec2 { x: x1, y: y1 } = rect.max();
        Self::from_flat(vec![x0, y0, x1, y0, x1, y1, x0, y1], true)
    }

    /// Closed polygon approximating an ellipse with `segments` points.
    pub fn ellipse(center: Vec2, radii: Vec2, segments: u32) -> Result<Self, GeomError> {
        if segments < 3 {
            return Err(GeomError::TooFewSegments(segments));
        }
        let step = TAU / segments as f32;
        let points = (0..segments)
            .flat_map(|i| {
                let a = step * i as f32;
                [center.x + radii.x * a.cos(), center.y + radii.y * a.sin()]
            })
            .collect();
        Self::new(points)
    }

    /// Open two-point polygon. It has no interior, so it can only be outlined.
    ///
    /// Coordinates are not validated.
    pub fn line(a: Vec2, b: Vec2) -> Self {
        Self::from_flat(vec![a.x, a.y, b.x, b.y], false)
    }

    /// Sets whether the outline returns to its first point.
    #[inline]
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Replaces the lazily computed triangulation with `tris`.
    pub fn with_triangulation(mut self, tris: TriangleList) -> Self {
        self.triangles = OnceCell::from(Some(tris));
        self
    }

    fn from_flat(points: Vec<f32>, closed: bool) -> Self {
        let bounds = Rect::bounding_flat(&points);
        let center = mean(&points);
        Self {
            points,
            closed,
            bounds,
            center,
            triangles: OnceCell::new(),
        }
    }

    fn triangulate(&self) -> Option<TriangleList> {
        if self.point_count() < 3 {
            return None;
        }

        let contour: Vec<Vec2> = (0..self.point_count()).map(|i| self.point(i)).collect();
        match tessellate(&contour) {
            Ok(tris) if !tris.is_empty() => Some(tris),
            Ok(_) => None,
            Err(err) => {
                log::warn!("Polygon: {err}; shape will not be fillable");
                None
            }
        }
    }
}

fn mean(points: &[f32]) -> Vec2 {
    let n = points.len() / 2;
    if n == 0 {
        return Vec2::zero();
    }
    let sum = points
        .chunks_exact(2)
        .fold(Vec2::zero(), |acc, p| acc + Vec2::new(p[0], p[1]));
    sum / n as f32
}

impl Shape for Polygon {
    #[inline]
    fn points(&self) -> &[f32] {
        &self.points
    }

    #[inline]
    fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    fn center(&self) -> Vec2 {
        self.center
    }

    fn triangles(&self) -> Option<&dyn Triangles> {
        self.triangles
            .get_or_init(|| self.triangulate())
            .as_ref()
            .map(|t| t as &dyn Triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_rejects_odd_coordinate_count() {
        let err = Polygon::new(vec![0.0, 0.0, 1.0]).unwrap_err();
        assert_eq!(err, GeomError::OddCoordinateCount(3));
    }

    #[test]
    fn new_rejects_non_finite() {
        let err = Polygon::new(vec![0.0, 0.0, f32::NAN, 1.0]).unwrap_err();
        assert_eq!(err, GeomError::NonFinite { index: 2 });
    }

    #[test]
    fn ellipse_rejects_too_few_segments() {
        let err = Polygon::ellipse(Vec2::zero(), Vec2::splat(1.0), 2).unwrap_err();
        assert_eq!(err, GeomError::TooFewSegments(2));
    }

    #[test]
    fn new_is_closed_by_default() {
        let p = Polygon::new(vec![0.0, 0.0, 10.0, 0.0, 5.0, 10.0]).unwrap();
        assert!(p.is_closed());
        assert!(!p.with_closed(false).is_closed());
    }

    // ── metrics ───────────────────────────────────────────────────────────

    #[test]
    fn bounds_and_center() {
        let p = Polygon::new(vec![0.0, 0.0, 10.0, 0.0, 5.0, 9.0]).unwrap();
        assert_eq!(p.bounds(), Rect::new(0.0, 0.0, 10.0, 9.0));
        assert_eq!(p.center(), Vec2::new(5.0, 3.0));
    }

    #[test]
    fn rect_corners_are_clockwise_from_top_left() {
        let p = Polygon::rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(p.points(), &[1.0, 2.0, 4.0, 2.0, 4.0, 6.0, 1.0, 6.0]);
        assert_eq!(p.center(), Vec2::new(2.5, 4.0));
    }

    #[test]
    fn ellipse_points_lie_on_the_ellipse() {
        let p = Polygon::ellipse(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0), 16).unwrap();
        assert_eq!(p.point_count(), 16);
        for i in 0..p.point_count() {
            let d = p.point(i) - Vec2::new(10.0, 10.0);
            let e = (d.x / 4.0).powi(2) + (d.y / 2.0).powi(2);
            assert!((e - 1.0).abs() < 1e-4);
        }
    }

    // ── triangulation ─────────────────────────────────────────────────────

    #[test]
    fn rect_triangulates_lazily() {
        let p = Polygon::rect(Rect::new(0.0, 0.0, 10.0, 5.0));
        let tris = p.triangles().expect("rect should be fillable");
        assert_eq!(tris.triangle_count(), 2);
    }

    #[test]
    fn ellipse_triangulation_covers_interior() {
        let p = Polygon::ellipse(Vec2::zero(), Vec2::splat(10.0), 32).unwrap();
        let count = p.triangles().map(|t| t.triangle_count()).unwrap_or(0);
        // A convex n-gon needs at least n - 2 triangles.
        assert!(count >= 30, "got {count} triangles");
    }

    #[test]
    fn polygon_with_more_points_than_u16_indices_is_fillable() {
        let p = Polygon::ellipse(Vec2::zero(), Vec2::splat(1000.0), 70_000).unwrap();
        let tris = p.triangles().expect("70000-point polygon should be fillable");

        let area: f32 = (0..tris.triangle_count())
            .map(|t| {
                let a = tris.triangle_point(t, 0);
                let ab = tris.triangle_point(t, 1) - a;
                let ac = tris.triangle_point(t, 2) - a;
                (ab.x * ac.y - ab.y * ac.x).abs() * 0.5
            })
            .sum();
        let expected = std::f32::consts::PI * 1000.0 * 1000.0;
        assert!((area - expected).abs() / expected < 1e-3, "area {area}");
    }

    #[test]
    fn line_has_no_triangulation() {
        let p = Polygon::line(Vec2::zero(), Vec2::new(5.0, 5.0));
        assert!(!p.is_closed());
        assert!(p.triangles().is_none());
    }

    #[test]
    fn supplied_triangulation_is_used_verbatim() {
        let mut tris = TriangleList::new();
        tris.push(Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
        let p = Polygon::rect(Rect::new(0.0, 0.0, 1.0, 1.0)).with_triangulation(tris);
        let t = p.triangles().unwrap();
        assert_eq!(t.triangle_count(), 1);
        assert_eq!(t.triangle_point(0, 1), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn supplied_empty_triangulation_stays_present() {
        let p = Polygon::rect(Rect::new(0.0, 0.0, 1.0, 1.0)).with_triangulation(TriangleList::new());
        assert_eq!(p.triangles().map(|t| t.triangle_count()), Some(0));
    }
}
