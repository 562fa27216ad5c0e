use crate::coords::Vec2;
use crate::geom::Shape;

use super::{Color, LinearGradient};

/// Per-vertex fill strategy.
///
/// Queried once per emitted vertex by the shape renderer's `*_with_fill`
/// operations. The color is applied immediately before the vertex; the
/// offset is added to the vertex position.
pub trait ShapeFill {
    /// Color at `local`, a point expressed relative to `shape.center()`.
    fn color_at(&self, shape: &dyn Shape, local: Vec2) -> Color;

    /// Positional offset for the vertex at absolute position `point`.
    fn offset_at(&self, shape: &dyn Shape, point: Vec2) -> Vec2;
}

impl<F: ShapeFill + ?Sized> ShapeFill for &F {
    #[inline]
    fn color_at(&self, shape: &dyn Shape, local: Vec2) -> Color {
        (**self).color_at(shape, local)
    }

    #[inline]
    fn offset_at(&self, shape: &dyn Shape, point: Vec2) -> Vec2 {
        (**self).offset_at(shape, point)
    }
}

/// Uniform color, no displacement.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolidFill {
    pub color: Color,
}

impl SolidFill {
    #[inline]
    pub const fn new(color: Color) -> Self {
        Self { color }
    }
}

impl ShapeFill for SolidFill {
    #[inline]
    fn color_at(&self, _shape: &dyn Shape, _local: Vec2) -> Color {
        self.color
    }

    #[inline]
    fn offset_at(&self, _shape: &dyn Shape, _point: Vec2) -> Vec2 {
        Vec2::zero()
    }
}

/// Linear gradient evaluated per vertex.
///
/// With `local = true` the gradient axis is given relative to the shape's
/// center, so the same fill follows the shape wherever it is drawn.
/// Otherwise the axis is in absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientFill {
    pub gradient: LinearGradient,
    pub local: bool,
}

impl GradientFill {
    pub fn local(gradient: LinearGradient) -> Self {
        Self { gradient, local: true }
    }

    pub fn absolute(gradient: LinearGradient) -> Self {
        Self { gradient, local: false }
    }
}

impl ShapeFill for GradientFill {
    fn color_at(&self, shape: &dyn Shape, local: Vec2) -> Color {
        let p = if self.local { local } else { local + shape.center() };
        self.gradient.color_at(p)
    }

    #[inline]
    fn offset_at(&self, _shape: &dyn Shape, _point: Vec2) -> Vec2 {
        Vec2::zero()
    }
}
