use crate::coords::Vec2;
use crate::geom::{Shape, Triangles};
use crate::paint::ShapeFill;

use super::hook::{FillColors, FitTexCoords, PassThrough, PointHook, TexCoords, TexturedFillColors};
use super::{Image, ImmediateBackend, Primitive, TextureScope};

/// Texture scale used by [`ShapeRenderer::texture`]: one texture repeat per 100 units.
pub const DEFAULT_TEXTURE_SCALE: Vec2 = Vec2::splat(0.01);

/// Texture scale used by [`ShapeRenderer::texture_fit`]: the texture fitted once across the bounds.
pub const DEFAULT_FIT_SCALE: Vec2 = Vec2::splat(1.0);

/// Defaults for the texture operations that take no explicit scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeRendererConfig {
    pub texture_scale: Vec2,
    pub fit_scale: Vec2,
}

impl Default for ShapeRendererConfig {
    fn default() -> Self {
        Self {
            texture_scale: DEFAULT_TEXTURE_SCALE,
            fit_scale: DEFAULT_FIT_SCALE,
        }
    }
}

/// Draws shapes through an [`ImmediateBackend`].
///
/// Only vertices (and, where stated, colors and texture coordinates) are
/// emitted; the current color must otherwise be set by the caller.
///
/// Every operation leaves the backend's texture binding as it found it.
/// Outline and untextured fills draw with no texture bound.
///
/// Fill and texture operations draw nothing when the shape has no
/// triangles (see [`ShapeRenderer::is_fillable`]).
///
/// # Panics
/// All operations panic if `shape.points()` has odd length.
#[derive(Debug, Clone, Default)]
pub struct ShapeRenderer {
    config: ShapeRendererConfig,
}

impl ShapeRenderer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_config(config: ShapeRendererConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ShapeRendererConfig {
        &self.config
    }

    /// True when the shape has a triangulation with at least one triangle.
    pub fn is_fillable(shape: &dyn Shape) -> bool {
        shape.triangles().is_some_and(|t| t.triangle_count() != 0)
    }

    // ── outlines ──────────────────────────────────────────────────────────

    /// Draws the outline as a line strip, repeating the first point when the shape is closed.
    pub fn draw(&self, backend: &mut dyn ImmediateBackend, shape: &dyn Shape) {
        outline(backend, shape, &mut PassThrough);
    }

    /// Draws the outline with per-point color and offset from `fill`.
    pub fn draw_with_fill(
        &self,
        backend: &mut dyn ImmediateBackend,
        shape: &dyn Shape,
        fill: &dyn ShapeFill,
    ) {
        outline(backend, shape, &mut FillColors::new(shape, fill));
    }

    // ── fills ─────────────────────────────────────────────────────────────

    /// Fills the shape's triangles.
    pub fn fill(&self, backend: &mut dyn ImmediateBackend, shape: &dyn Shape) {
        let Some(tris) = fillable_triangles(shape) else {
            return;
        };
        let mut scope = TextureScope::bind(backend, None);
        fill_triangles(&mut *scope, tris, &mut PassThrough);
    }

    /// Fills the shape's triangles with per-vertex color and offset from `fill`.
    pub fn fill_with(
        &self,
        backend: &mut dyn ImmediateBackend,
        shape: &dyn Shape,
        fill: &dyn ShapeFill,
    ) {
        let Some(tris) = fillable_triangles(shape) else {
            return;
        };
        let mut scope = TextureScope::bind(backend, None);
        fill_triangles(&mut *scope, tris, &mut FillColors::new(shape, fill));
    }

    /// Fills the shape's triangles, running `hook` before every vertex.
    ///
    /// The texture binding is left as the caller set it, so a hook can
    /// supply texture coordinates for a texture bound beforehand.
    pub fn fill_with_hook(
        &self,
        backend: &mut dyn ImmediateBackend,
        shape: &dyn Shape,
        hook: &mut dyn PointHook,
    ) {
        let Some(tris) = fillable_triangles(shape) else {
            return;
        };
        fill_triangles(backend, tris, hook);
    }

    // ── textures ──────────────────────────────────────────────────────────

    /// Tiles `image` across the shape at the configured `texture_scale`.
    pub fn texture(&self, backend: &mut dyn ImmediateBackend, shape: &dyn Shape, image: &Image) {
        self.texture_scaled(backend, shape, image, self.config.texture_scale);
    }

    /// Tiles `image` across the shape with `uv = position * scale`.
    pub fn texture_scaled(
        &self,
        backend: &mut dyn ImmediateBackend,
        shape: &dyn Shape,
        image: &Image,
        scale: Vec2,
    ) {
        let Some(tris) = fillable_triangles(shape) else {
            return;
        };
        let mut scope = TextureScope::bind(backend, Some(image.texture().id));
        fill_triangles(&mut *scope, tris, &mut TexCoords { scale });
    }

    /// Fits `image` across the shape's bounds at the configured `fit_scale`.
    pub fn texture_fit(&self, backend: &mut dyn ImmediateBackend, shape: &dyn Shape, image: &Image) {
        self.texture_fit_scaled(backend, shape, image, self.config.fit_scale);
    }

    /// Fits `image` `scale.x` times across and `scale.y` times down the shape's bounds.
    pub fn texture_fit_scaled(
        &self,
        backend: &mut dyn ImmediateBackend,
        shape: &dyn Shape,
        image: &Image,
        scale: Vec2,
    ) {
        let Some(tris) = fillable_triangles(shape) else {
            return;
        };
        let mut scope = TextureScope::bind(backend, Some(image.texture().id));
        fill_triangles(&mut *scope, tris, &mut FitTexCoords::for_bounds(shape.bounds(), scale));
    }

    /// Tiles `image` across the shape while applying `fill` per vertex.
    pub fn texture_with_fill(
        &self,
        backend: &mut dyn ImmediateBackend,
        shape: &dyn Shape,
        image: &Image,
        scale: Vec2,
        fill: &dyn ShapeFill,
    ) {
        let Some(tris) = fillable_triangles(shape) else {
            return;
        };
        let mut scope = TextureScope::bind(backend, Some(image.texture().id));
        fill_triangles(&mut *scope, tris, &mut TexturedFillColors::new(shape, fill, scale));
    }
}

fn check_points(shape: &dyn Shape) {
    let n = shape.points().len();
    assert!(n.is_multiple_of(2), "shape point list has odd length {n}; expected x,y pairs");
}

/// Triangles to fill, or `None` when the shape is not fillable.
fn fillable_triangles(shape: &dyn Shape) -> Option<&dyn Triangles> {
    check_points(shape);
    match shape.triangles() {
        Some(tris) if tris.triangle_count() != 0 => Some(tris),
        _ => {
            log::trace!("ShapeRenderer: shape has no triangles; fill skipped");
            None
        }
    }
}

#[inline]
fn emit<H: PointHook + ?Sized>(backend: &mut dyn ImmediateBackend, hook: &mut H, point: Vec2) {
    let p = hook.pre_render_point(backend, point).unwrap_or(point);
    backend.vertex(p);
}

fn outline<H: PointHook + ?Sized>(backend: &mut dyn ImmediateBackend, shape: &dyn Shape, hook: &mut H) {
    check_points(shape);
    let points = shape.points();
    if points.is_empty() {
        return;
    }

    let mut scope = TextureScope::bind(backend, None);
    scope.begin(Primitive::LineStrip);
    for p in points.chunks_exact(2) {
        emit(&mut *scope, hook, Vec2::new(p[0], p[1]));
    }
    if shape.is_closed() {
        emit(&mut *scope, hook, Vec2::new(points[0], points[1]));
    }
    scope.end();
}

/// Emits every triangle corner, in triangle order and corner order 0-1-2,
/// as one `Triangles` primitive. `hook` may replace each position.
fn fill_triangles<H: PointHook + ?Sized>(
    backend: &mut dyn ImmediateBackend,
    tris: &dyn Triangles,
    hook: &mut H,
) {
    backend.begin(Primitive::Triangles);
    for t in 0..tris.triangle_count() {
        for corner in 0..3 {
            emit(backend, hook, tris.triangle_point(t, corner));
        }
    }
    backend.end();
}
