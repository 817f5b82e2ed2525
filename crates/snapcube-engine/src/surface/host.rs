use crate::render::RenderError;
use crate::scene::Scene;

use super::SurfaceSize;

/// GPU-backed drawable created for one surface activation.
///
/// `render` records a pass for `scene`; `present` makes it visible. A drawable is
/// dropped when its surface is deactivated, which releases every GPU object it
/// created (textures included).
pub trait Drawable {
    fn render(&mut self, scene: &Scene) -> Result<(), RenderError>;

    fn present(&mut self) -> Result<(), RenderError>;

    fn resize(&mut self, size: SurfaceSize);
}

/// Display surface host: provides the viewport and creates drawables on demand.
pub trait SurfaceHost {
    type Drawable: Drawable;

    /// Current viewport in physical pixels.
    fn viewport(&self) -> SurfaceSize;

    /// Allocates a drawable sized to `size`.
    fn create_drawable(&mut self, size: SurfaceSize) -> anyhow::Result<Self::Drawable>;
}
