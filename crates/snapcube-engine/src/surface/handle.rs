use std::fmt;

/// Identity of one surface activation. Never reused within a lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) u64);

impl SurfaceId {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// wgpu cannot configure a 0-sized swapchain; neither can we build a camera for it.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height. Only meaningful when `!is_empty()`.
    #[inline]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Snapshot handle of a rendering surface.
///
/// Copies handed out by the lifecycle do not track later invalidation; compare
/// against `RenderSurfaceLifecycle::surface()` to learn the current state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RenderingSurface {
    id: SurfaceId,
    size: SurfaceSize,
    valid: bool,
}

impl RenderingSurface {
    pub(crate) fn new(id: SurfaceId, size: SurfaceSize) -> Self {
        Self { id, size, valid: true }
    }

    #[inline]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[inline]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }

    pub(crate) fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }
}
