use std::fmt;

/// Failure of a single render or present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Transient (swapchain timeout or reconfigure); drop this frame only.
    SkipFrame,
    /// The surface cannot be drawn to again; it must be recreated.
    SurfaceLost(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SkipFrame => write!(f, "frame skipped"),
            RenderError::SurfaceLost(reason) => write!(f, "surface lost: {reason}"),
        }
    }
}

impl std::error::Error for RenderError {}
