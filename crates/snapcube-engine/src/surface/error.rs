use std::fmt;

/// Failure to obtain or use a rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The platform could not provide a drawable (no graphics context, zero
    /// viewport, device loss during creation).
    Unavailable(String),
    /// An operation needed an active surface and none exists.
    NotActive,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Unavailable(reason) => write!(f, "rendering surface unavailable: {reason}"),
            SurfaceError::NotActive => write!(f, "no active rendering surface"),
        }
    }
}

impl std::error::Error for SurfaceError {}
