use std::fmt;

/// Where the capture sequence stands.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    /// Waiting for the camera.
    Capturing,
    /// Waiting for the decode and texture swap.
    TextureBridging,
    /// The textured mesh was rendered; becomes `Idle` on the next pump.
    Rendered,
    /// Camera access was refused. Terminal.
    PermissionDenied,
}

impl CaptureState {
    /// A sequence is in flight and new triggers are ignored.
    #[inline]
    pub fn is_busy(self) -> bool {
        matches!(self, CaptureState::Capturing | CaptureState::TextureBridging)
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaptureState::Idle => "idle",
            CaptureState::Capturing => "capturing",
            CaptureState::TextureBridging => "texture-bridging",
            CaptureState::Rendered => "rendered",
            CaptureState::PermissionDenied => "permission-denied",
        };
        f.write_str(s)
    }
}
