use core::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color;

use super::{ImmediateBackend, Primitive, TextureId};

/// Vertex layout consumed by the GPU renderer (32 bytes).
///
///  offset  0  pos    [f32; 2]   loc 0
///  offset  8  uv     [f32; 2]   loc 1
///  offset 16  color  [f32; 4]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ImmediateVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// GPU topology a batch is drawn with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    LineList,
    TriangleList,
}

/// Contiguous vertex range sharing a topology and a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBatch {
    pub topology: Topology,
    pub texture: Option<TextureId>,
    pub range: Range<u32>,
}

/// Primitive currently between `begin` and `end`.
#[derive(Debug)]
enum Open {
    Strip { last: Option<ImmediateVertex> },
    Triangles { pending: [ImmediateVertex; 3], len: usize },
}

/// Backend that turns immediate-mode calls into GPU-ready vertex batches.
///
/// State follows fixed-function conventions: the current color starts
/// opaque white and the current texture coordinate starts at zero; both are
/// captured by each vertex. Line strips are expanded into independent
/// segments so consecutive strips can share a batch. Incomplete triangles
/// are dropped at `end`.
///
/// Performance characteristics:
/// - `vertex()` is amortized O(1)
/// - `clear()` keeps allocated capacity for reuse across frames
#[derive(Debug)]
pub struct VertexBatch {
    vertices: Vec<ImmediateVertex>,
    batches: Vec<DrawBatch>,

    color: Color,
    uv: Vec2,
    bound: Option<TextureId>,
    open: Option<Open>,

    warned_outside_primitive: bool,
}

impl Default for VertexBatch {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            batches: Vec::new(),
            color: Color::WHITE,
            uv: Vec2::zero(),
            bound: None,
            open: None,
            warned_outside_primitive: false,
        }
    }
}

impl VertexBatch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded geometry and any open primitive.
    ///
    /// Color, texture coordinate and binding state carry over, as they
    /// would on a fixed-function context.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.batches.clear();
        self.open = None;
    }

    #[inline]
    pub fn vertices(&self) -> &[ImmediateVertex] {
        &self.vertices
    }

    #[inline]
    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    fn current_vertex(&self, position: Vec2) -> ImmediateVertex {
        ImmediateVertex {
            pos: position.to_array(),
            uv: self.uv.to_array(),
            color: self.color.to_array(),
        }
    }

    fn push(&mut self, topology: Topology, verts: &[ImmediateVertex]) {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(verts);
        let end = self.vertices.len() as u32;

        if let Some(last) = self.batches.last_mut()
            && last.topology == topology
            && last.texture == self.bound
            && last.range.end == start
        {
            last.range.end = end;
            return;
        }

        self.batches.push(DrawBatch {
            topology,
            texture: self.bound,
            range: start..end,
        });
    }
}

impl ImmediateBackend for VertexBatch {
    fn begin(&mut self, primitive: Primitive) {
        if self.open.is_some() {
            log::debug!("VertexBatch: begin() while a primitive is open; closing it");
            self.end();
        }
        self.open = Some(match primitive {
            Primitive::LineStrip => Open::Strip { last: None },
            Primitive::Triangles => Open::Triangles {
                pending: [ImmediateVertex::zeroed(); 3],
                len: 0,
            },
        });
    }

    fn end(&mut self) {
        self.open = None;
    }

    fn vertex(&mut self, position: Vec2) {
        let v = self.current_vertex(position);
        match self.open.take() {
            None => {
                if !self.warned_outside_primitive {
                    log::debug!("VertexBatch: vertex() outside begin()/end(); ignored");
                    self.warned_outside_primitive = true;
                }
            }
            Some(Open::Strip { last }) => {
                if let Some(prev) = last {
                    self.push(Topology::LineList, &[prev, v]);
                }
                self.open = Some(Open::Strip { last: Some(v) });
            }
            Some(Open::Triangles { mut pending, len }) => {
                pending[len] = v;
                let len = len + 1;
                if len == 3 {
                    self.push(Topology::TriangleList, &pending);
                    self.open = Some(Open::Triangles { pending, len: 0 });
                } else {
                    self.open = Some(Open::Triangles { pending, len });
                }
            }
        }
    }

    #[inline]
    fn tex_coord(&mut self, uv: Vec2) {
        self.uv = uv;
    }

    #[inline]
    fn color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    fn bound_texture(&self) -> Option<TextureId> {
        self.bound
    }

    #[inline]
    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.bound = texture;
    }
}
