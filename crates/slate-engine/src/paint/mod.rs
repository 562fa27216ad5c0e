//! Paint model shared by fills and backends.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - gradients
//! - per-vertex fill strategies (`ShapeFill`)
//!
//! Geometry types remain in `coords` and `geom`.

pub mod color;
pub mod fill;
pub mod gradient;

pub use color::Color;
pub use fill::{GradientFill, ShapeFill, SolidFill};
pub use gradient::{ColorStop, LinearGradient, SpreadMode};
