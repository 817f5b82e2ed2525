//! Rendering: the on-demand render loop and its wgpu backend.
//!
//! `RenderLoop` decides *whether* a frame may be drawn (valid surface, matching
//! scene) and counts presents. The wgpu side (`GpuSurface` + `MeshRenderer`)
//! only knows how to draw one scene into one swapchain image.

mod ctx;
mod error;
mod gpu_surface;
mod mesh_renderer;
mod render_loop;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::RenderError;
pub use gpu_surface::GpuSurface;
pub use mesh_renderer::MeshRenderer;
pub use render_loop::{RenderLoop, RenderMode, RenderOutcome};
