use std::fmt;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use snapcube_engine::texture::RasterBytes;

/// Still-capture options handed to the camera.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CaptureOptions {
    /// Ask for the encoded image bytes rather than a file reference.
    pub wants_raw_bytes: bool,
    /// Encoder quality in `[0, 1]`. The texture is small on screen, so lowest wins.
    pub quality: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            wants_raw_bytes: true,
            quality: 0.0,
        }
    }
}

/// Why the camera did not produce a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    PermissionDenied,
    Device(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::PermissionDenied => write!(f, "capture failed: camera permission denied"),
            CaptureError::Device(reason) => write!(f, "capture failed: {reason}"),
        }
    }
}

impl std::error::Error for CaptureError {}

pub type CaptureResult = Result<RasterBytes, CaptureError>;

/// Camera device seam. `capture` starts a still capture and returns at once.
pub trait CameraCapture {
    fn capture(&mut self, options: &CaptureOptions) -> PendingCapture;
}

/// A capture that has been started but may not have finished.
#[derive(Debug)]
pub struct PendingCapture {
    rx: Receiver<CaptureResult>,
}

/// Completes a [`PendingCapture`], from any thread.
#[derive(Debug)]
pub struct CaptureResolver {
    tx: Sender<CaptureResult>,
}

impl PendingCapture {
    /// Creates a linked resolver/pending pair.
    pub fn channel() -> (CaptureResolver, PendingCapture) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (CaptureResolver { tx }, PendingCapture { rx })
    }

    /// A capture that already finished.
    pub fn ready(result: CaptureResult) -> Self {
        let (resolver, pending) = Self::channel();
        resolver.resolve(result);
        pending
    }

    /// Non-blocking check for the result.
    ///
    /// A resolver dropped without resolving reads as a device failure.
    pub fn poll(&mut self) -> Option<CaptureResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CaptureError::Device(
                "camera abandoned the capture".to_string(),
            ))),
        }
    }
}

impl CaptureResolver {
    pub fn resolve(self, result: CaptureResult) {
        // The capture may have been given up on; nobody is left to tell.
        let _ = self.tx.send(result);
    }
}
