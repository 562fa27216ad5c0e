//! Per-vertex hooks run by the shape renderer before each vertex is emitted.
//!
//! A hook may emit state (color, texture coordinates) into the backend and
//! may return a replacement position. Returning `None` emits the original
//! position.

use crate::coords::{Rect, Vec2};
use crate::geom::Shape;
use crate::paint::ShapeFill;

use super::ImmediateBackend;

pub trait PointHook {
    fn pre_render_point(&mut self, backend: &mut dyn ImmediateBackend, point: Vec2)
        -> Option<Vec2>;
}

impl<F> PointHook for F
where
    F: FnMut(&mut dyn ImmediateBackend, Vec2) -> Option<Vec2>,
{
    #[inline]
    fn pre_render_point(&mut self, backend: &mut dyn ImmediateBackend, point: Vec2) -> Option<Vec2> {
        self(backend, point)
    }
}

/// Emits the vertex unchanged.
#[derive(Debug, Copy, Clone, Default)]
pub struct PassThrough;

impl PointHook for PassThrough {
    #[inline]
    fn pre_render_point(&mut self, _backend: &mut dyn ImmediateBackend, _point: Vec2) -> Option<Vec2> {
        None
    }
}

/// Texture coordinates proportional to position: `uv = point * scale`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TexCoords {
    pub scale: Vec2,
}

impl PointHook for TexCoords {
    #[inline]
    fn pre_render_point(&mut self, backend: &mut dyn ImmediateBackend, point: Vec2) -> Option<Vec2> {
        backend.tex_coord(point.scale(self.scale));
        None
    }
}

/// Texture coordinates normalized to a bounding box, then scaled.
///
/// The box's min corner maps to `(0, 0)` and its max corner to `scale`.
/// An axis with zero extent maps to `0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitTexCoords {
    pub origin: Vec2,
    pub extent: Vec2,
    pub scale: Vec2,
}

impl FitTexCoords {
    pub fn for_bounds(bounds: Rect, scale: Vec2) -> Self {
        Self {
            origin: bounds.min(),
            extent: bounds.size,
            scale,
        }
    }

    #[inline]
    pub fn uv_at(&self, point: Vec2) -> Vec2 {
        let d = point - self.origin;
        Vec2::new(
            normalize(d.x, self.extent.x) * self.scale.x,
            normalize(d.y, self.extent.y) * self.scale.y,
        )
    }
}

#[inline]
fn normalize(d: f32, extent: f32) -> f32 {
    if extent > 0.0 { d / extent } else { 0.0 }
}

impl PointHook for FitTexCoords {
    #[inline]
    fn pre_render_point(&mut self, backend: &mut dyn ImmediateBackend, point: Vec2) -> Option<Vec2> {
        backend.tex_coord(self.uv_at(point));
        None
    }
}

/// Applies a [`ShapeFill`]: color before the vertex, vertex moved by the fill's offset.
pub struct FillColors<'s, F> {
    shape: &'s dyn Shape,
    fill: F,
    center: Vec2,
}

impl<'s, F: ShapeFill> FillColors<'s, F> {
    pub fn new(shape: &'s dyn Shape, fill: F) -> Self {
        Self {
            shape,
            fill,
            center: shape.center(),
        }
    }

    /// Emits the fill color for `point` and returns its displaced position.
    #[inline]
    fn apply(&self, backend: &mut dyn ImmediateBackend, point: Vec2) -> Vec2 {
        backend.color(self.fill.color_at(self.shape, point - self.center));
        point + self.fill.offset_at(self.shape, point)
    }
}

impl<F: ShapeFill> PointHook for FillColors<'_, F> {
    #[inline]
    fn pre_render_point(&mut self, backend: &mut dyn ImmediateBackend, point: Vec2) -> Option<Vec2> {
        Some(self.apply(backend, point))
    }
}

/// [`FillColors`] plus position-scaled texture coordinates.
///
/// Texture coordinates are taken from the undisplaced position.
pub struct TexturedFillColors<'s, F> {
    fill: FillColors<'s, F>,
    scale: Vec2,
}

impl<'s, F: ShapeFill> TexturedFillColors<'s, F> {
    pub fn new(shape: &'s dyn Shape, fill: F, scale: Vec2) -> Self {
        Self {
            fill: FillColors::new(shape, fill),
            scale,
        }
    }
}

impl<F: ShapeFill> PointHook for TexturedFillColors<'_, F> {
    #[inline]
    fn pre_render_point(&mut self, backend: &mut dyn ImmediateBackend, point: Vec2) -> Option<Vec2> {
        let moved = self.fill.apply(backend, point);
        backend.tex_coord(point.scale(self.scale));
        Some(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Color, SolidFill};
    use crate::render::{CommandRecorder, DrawCommand};

    #[test]
    fn closure_hook_can_replace_position() {
        let mut rec = CommandRecorder::new();
        let mut hook = |_: &mut dyn ImmediateBackend, p: Vec2| Some(p * 2.0);
        assert_eq!(
            hook.pre_render_point(&mut rec, Vec2::new(1.0, 2.0)),
            Some(Vec2::new(2.0, 4.0))
        );
        assert!(rec.is_empty());
    }

    #[test]
    fn tex_coords_scale_position() {
        let mut rec = CommandRecorder::new();
        let mut hook = TexCoords { scale: Vec2::new(0.5, 0.25) };
        assert_eq!(hook.pre_render_point(&mut rec, Vec2::new(4.0, 8.0)), None);
        assert_eq!(rec.commands(), &[DrawCommand::TexCoord(Vec2::new(2.0, 2.0))]);
    }

    #[test]
    fn fit_maps_bounds_corners_to_scale() {
        let hook = FitTexCoords::for_bounds(Rect::new(100.0, 50.0, 20.0, 10.0), Vec2::new(2.0, 3.0));
        assert_eq!(hook.uv_at(Vec2::new(100.0, 50.0)), Vec2::new(0.0, 0.0));
        assert_eq!(hook.uv_at(Vec2::new(120.0, 60.0)), Vec2::new(2.0, 3.0));
        assert_eq!(hook.uv_at(Vec2::new(110.0, 55.0)), Vec2::new(1.0, 1.5));
    }

    #[test]
    fn fit_zero_extent_axis_maps_to_zero() {
        let hook = FitTexCoords::for_bounds(Rect::new(0.0, 5.0, 10.0, 0.0), Vec2::splat(1.0));
        assert_eq!(hook.uv_at(Vec2::new(5.0, 5.0)), Vec2::new(0.5, 0.0));
    }

    struct Nudge;

    impl ShapeFill for Nudge {
        fn color_at(&self, _shape: &dyn Shape, local: Vec2) -> Color {
            Color::from_premul(local.x, local.y, 0.0, 1.0)
        }

        fn offset_at(&self, _shape: &dyn Shape, _point: Vec2) -> Vec2 {
            Vec2::new(1.0, -1.0)
        }
    }

    #[test]
    fn fill_colors_use_center_relative_point() {
        let shape = crate::geom::Polygon::rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let mut rec = CommandRecorder::new();
        let mut hook = FillColors::new(&shape, Nudge);

        let moved = hook.pre_render_point(&mut rec, Vec2::new(4.0, 0.0));
        assert_eq!(moved, Some(Vec2::new(5.0, -1.0)));
        assert_eq!(rec.commands(), &[DrawCommand::Color(Color::from_premul(2.0, -2.0, 0.0, 1.0))]);
    }

    #[test]
    fn textured_fill_emits_color_then_uv() {
        let shape = crate::geom::Polygon::rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let mut rec = CommandRecorder::new();
        let mut hook = TexturedFillColors::new(&shape, SolidFill::new(Color::WHITE), Vec2::splat(0.5));

        let moved = hook.pre_render_point(&mut rec, Vec2::new(2.0, 4.0));
        assert_eq!(moved, Some(Vec2::new(2.0, 4.0)));
        assert_eq!(
            rec.commands(),
            &[
                DrawCommand::Color(Color::WHITE),
                DrawCommand::TexCoord(Vec2::new(1.0, 2.0)),
            ]
        );
    }
}
