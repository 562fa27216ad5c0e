//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a surface
//! - owning an off-screen color target and reading its pixels back

mod gpu;
mod init;
mod target;

pub use gpu::HeadlessGpu;
pub use init::GpuInit;
pub use target::OffscreenTarget;
