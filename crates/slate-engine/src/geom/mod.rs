//! Shapes as seen by the shape renderer.
//!
//! A shape exposes a flat vertex list, a closed flag, bounds, a center and an
//! optional triangulation. `Polygon` is the owned implementation; anything
//! else can implement [`Shape`] directly.

mod error;
mod polygon;
mod shape;
mod tessellate;
mod triangles;

pub use error::GeomError;
pub use polygon::Polygon;
pub use shape::Shape;
pub use tessellate::tessellate;
pub use triangles::{TriangleList, Triangles};
