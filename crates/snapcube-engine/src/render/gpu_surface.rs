use anyhow::Result;

use crate::device::{Gpu, GpuFrame, GpuInit};
use crate::scene::Scene;
use crate::surface::{Drawable, SurfaceSize};

use super::{MeshRenderer, RenderCtx, RenderError, RenderTarget};

/// wgpu-backed [`Drawable`]: one device, one swapchain, one mesh renderer.
///
/// `render` acquires a swapchain image and records the mesh pass; `present`
/// submits and flips it. Dropping a `GpuSurface` releases the device together
/// with every texture the renderer uploaded.
pub struct GpuSurface<'w> {
    gpu: Gpu<'w>,
    renderer: MeshRenderer,
    pending: Option<GpuFrame>,
}

impl<'w> GpuSurface<'w> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        size: SurfaceSize,
        init: GpuInit,
    ) -> Result<Self> {
        let gpu = Gpu::new(target, size, init).await?;
        Ok(Self {
            gpu,
            renderer: MeshRenderer::new(),
            pending: None,
        })
    }

    pub fn size(&self) -> SurfaceSize {
        self.gpu.size()
    }

    fn acquire(&mut self) -> Result<GpuFrame, RenderError> {
        match self.gpu.begin_frame() {
            Ok(frame) => Ok(frame),
            Err(err) => {
                let reason = err.to_string();
                let action = self.gpu.handle_surface_error(err);
                if action.is_fatal() {
                    return Err(RenderError::SurfaceLost(reason));
                }
                log::debug!("swapchain: {reason} ({action:?})");
                Err(RenderError::SkipFrame)
            }
        }
    }
}

impl Drawable for GpuSurface<'_> {
    fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        // An unpresented frame is superseded.
        self.pending = None;

        let mut frame = self.acquire()?;
        let ctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.gpu.size(),
        );
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
        self.renderer.render(&ctx, &mut target, scene);

        self.pending = Some(frame);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let frame = self.pending.take().ok_or(RenderError::SkipFrame)?;
        self.gpu.submit(frame);
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.pending = None;
        self.gpu.resize(size);
    }
}
