use super::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle spanning `min..max`. Corners may be given in any order.
    #[inline]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Rect::from_origin_size(min, max - min).normalized()
    }

    /// Smallest rectangle containing every point of a flat `[x0, y0, x1, y1, ..]` list.
    ///
    /// Returns the zero rect for an empty list. A trailing odd coordinate is ignored.
    pub fn bounding_flat(coords: &[f32]) -> Self {
        let mut pairs = coords.chunks_exact(2);
        let Some(first) = pairs.next() else {
            return Rect::default();
        };

        let mut min = Vec2::new(first[0], first[1]);
        let mut max = min;
        for p in pairs {
            min.x = min.x.min(p[0]);
            min.y = min.y.min(p[1]);
            max.x = max.x.max(p[0]);
            max.y = max.y.max(p[1]);
        }

        Rect::from_origin_size(min, max - min)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_positive_is_identity() {
        let rect = r(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.normalized(), rect);
    }

    #[test]
    fn normalized_negative_width() {
        let n = r(10.0, 0.0, -4.0, 5.0).normalized();
        assert_eq!(n.origin.x, 6.0);
        assert_eq!(n.size.x, 4.0);
    }

    #[test]
    fn from_min_max_accepts_swapped_corners() {
        let rect = Rect::from_min_max(Vec2::new(10.0, 8.0), Vec2::new(2.0, 4.0));
        assert_eq!(rect, r(2.0, 4.0, 8.0, 4.0));
    }

    // ── bounding_flat ─────────────────────────────────────────────────────

    #[test]
    fn bounding_flat_triangle() {
        let rect = Rect::bounding_flat(&[0.0, 0.0, 10.0, 0.0, 5.0, 10.0]);
        assert_eq!(rect, r(0.0, 0.0, 10.0, 10.0));
        assert_eq!(rect.center(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn bounding_flat_negative_coordinates() {
        let rect = Rect::bounding_flat(&[-3.0, 4.0, 7.0, -2.0]);
        assert_eq!(rect.min(), Vec2::new(-3.0, -2.0));
        assert_eq!(rect.max(), Vec2::new(7.0, 4.0));
    }

    #[test]
    fn bounding_flat_empty_is_zero() {
        assert_eq!(Rect::bounding_flat(&[]), Rect::default());
    }

    #[test]
    fn bounding_flat_single_point_is_empty() {
        let rect = Rect::bounding_flat(&[3.0, 3.0]);
        assert!(rect.is_empty());
        assert_eq!(rect.origin, Vec2::new(3.0, 3.0));
    }

    // ── is_empty ──────────────────────────────────────────────────────────

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(r(0.0, 0.0, 5.0, 0.0).is_empty());
    }

    #[test]
    fn is_empty_positive_size() {
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
