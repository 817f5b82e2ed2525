use std::fmt;

use snapcube_engine::surface::SurfaceError;
use snapcube_engine::texture::DecodeError;

use crate::camera::CaptureError;

/// Everything that can go wrong in the overlay, by how the UI must react.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// No surface to draw on until one is recreated.
    SurfaceUnavailable(SurfaceError),
    /// Camera access refused; the feature stays off for this session.
    PermissionDenied,
    /// The captured image could not be decoded; the mesh keeps its material.
    ImageDecodeFailed(DecodeError),
    /// The camera failed to take the photo; capture may be retried.
    DeviceCaptureFailed(CaptureError),
}

impl OverlayError {
    /// Whether the failure must be shown to the user as a blocking message.
    ///
    /// Decode and capture failures are recovered locally and only logged.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            OverlayError::SurfaceUnavailable(_) | OverlayError::PermissionDenied
        )
    }

    /// Text shown to the user for blocking failures.
    pub fn user_message(&self) -> String {
        match self {
            OverlayError::PermissionDenied => "No access to camera".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::SurfaceUnavailable(e) => write!(f, "{e}"),
            OverlayError::PermissionDenied => write!(f, "camera permission denied"),
            OverlayError::ImageDecodeFailed(e) => write!(f, "{e}"),
            OverlayError::DeviceCaptureFailed(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OverlayError::SurfaceUnavailable(e) => Some(e),
            OverlayError::ImageDecodeFailed(e) => Some(e),
            OverlayError::DeviceCaptureFailed(e) => Some(e),
            OverlayError::PermissionDenied => None,
        }
    }
}

impl From<SurfaceError> for OverlayError {
    fn from(e: SurfaceError) -> Self {
        OverlayError::SurfaceUnavailable(e)
    }
}

impl From<DecodeError> for OverlayError {
    fn from(e: DecodeError) -> Self {
        OverlayError::ImageDecodeFailed(e)
    }
}

impl From<CaptureError> for OverlayError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::PermissionDenied => OverlayError::PermissionDenied,
            other => OverlayError::DeviceCaptureFailed(other),
        }
    }
}
