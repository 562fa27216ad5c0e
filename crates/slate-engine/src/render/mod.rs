//! Immediate-mode shape rendering.
//!
//! [`ShapeRenderer`] walks a shape's points and issues begin/vertex/end calls
//! against an [`ImmediateBackend`]. Backends decide what those calls become:
//! a recorded command list, or vertex batches drawn with wgpu.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

mod backend;
mod batch;
mod ctx;
mod gpu;
pub mod hook;
mod recorder;
mod shape_renderer;
mod texture;

pub use backend::{ImmediateBackend, Primitive};
pub use batch::{DrawBatch, ImmediateVertex, Topology, VertexBatch};
pub use ctx::{RenderCtx, RenderTarget};
pub use gpu::ImmediateRenderer;
pub use hook::PointHook;
pub use recorder::{CommandRecorder, DrawCommand};
pub use shape_renderer::{
    DEFAULT_FIT_SCALE, DEFAULT_TEXTURE_SCALE, ShapeRenderer, ShapeRendererConfig,
};
pub use texture::{Image, Texture, TextureId, TextureScope};
