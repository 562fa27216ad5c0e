use crate::coords::Vec2;
use crate::paint::Color;

use super::TextureId;

/// Primitive assembled from the vertices between `begin` and `end`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    /// Connected segments: every vertex after the first closes a segment.
    LineStrip,
    /// Independent triangles: every three vertices form one triangle.
    Triangles,
}

/// Fixed-function style drawing interface.
///
/// Color and texture coordinates are sticky: they apply to every vertex
/// emitted after them until changed. The bound texture is global state of
/// the backend and is visible across primitives.
pub trait ImmediateBackend {
    fn begin(&mut self, primitive: Primitive);

    fn end(&mut self);

    fn vertex(&mut self, position: Vec2);

    fn tex_coord(&mut self, uv: Vec2);

    fn color(&mut self, color: Color);

    /// Texture currently bound, `None` when unbound.
    fn bound_texture(&self) -> Option<TextureId>;

    fn bind_texture(&mut self, texture: Option<TextureId>);
}
