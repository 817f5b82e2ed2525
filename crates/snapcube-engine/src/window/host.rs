use std::sync::Arc;

use anyhow::Result;
use winit::window::Window;

use crate::device::GpuInit;
use crate::render::GpuSurface;
use crate::surface::{SurfaceHost, SurfaceSize};

/// A winit window acting as the display surface host.
///
/// Every `create_drawable` builds a fresh wgpu device + swapchain on the
/// window; the window itself outlives any number of surface activations.
#[derive(Clone)]
pub struct WindowHost {
    window: Arc<Window>,
    gpu_init: GpuInit,
}

impl WindowHost {
    pub fn new(window: Arc<Window>, gpu_init: GpuInit) -> Self {
        Self { window, gpu_init }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl SurfaceHost for WindowHost {
    type Drawable = GpuSurface<'static>;

    fn viewport(&self) -> SurfaceSize {
        let size = self.window.inner_size();
        SurfaceSize::new(size.width, size.height)
    }

    fn create_drawable(&mut self, size: SurfaceSize) -> Result<Self::Drawable> {
        pollster::block_on(GpuSurface::new(
            Arc::clone(&self.window),
            size,
            self.gpu_init.clone(),
        ))
    }
}
