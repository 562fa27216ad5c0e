//! Slate engine crate.
//!
//! Immediate-mode 2D shape rendering: shapes and their triangulation, fills,
//! a shape renderer driving an abstract backend, and a wgpu backend that
//! draws off-screen.

pub mod coords;
pub mod device;
pub mod geom;
pub mod logging;
pub mod paint;
pub mod render;
