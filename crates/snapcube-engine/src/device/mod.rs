//! GPU device + swapchain management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the swapchain surface
//! - acquiring frames and providing encoders/views for rendering

mod gpu;
mod init;
mod swapchain;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use swapchain::SurfaceErrorAction;
