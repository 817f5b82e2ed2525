use std::sync::Arc;

use winit::window::Window;

use crate::device::GpuInit;
use crate::surface::SurfaceSize;
use crate::window::WindowHost;

/// Window handle passed to `core::App` callbacks.
pub struct WindowCtx<'a> {
    window: &'a Arc<Window>,
}

impl<'a> WindowCtx<'a> {
    pub(crate) fn new(window: &'a Arc<Window>) -> Self {
        Self { window }
    }

    /// Wraps the window as a surface host configured with `gpu_init`.
    pub fn host(&self, gpu_init: GpuInit) -> WindowHost {
        WindowHost::new(Arc::clone(self.window), gpu_init)
    }

    /// Drawable size in physical pixels.
    pub fn size(&self) -> SurfaceSize {
        let phys = self.window.inner_size();
        SurfaceSize::new(phys.width, phys.height)
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
