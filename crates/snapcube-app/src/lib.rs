//! snapcube application layer.
//!
//! Wires the engine's surface lifecycle, texture bridge and render loop to the
//! outside world: a camera that takes still photos, a permission prompt and an
//! angular-rate sensor. Those collaborators are traits so a platform (or a test)
//! can supply its own.

pub mod camera;
pub mod capture;
pub mod error;
pub mod orientation;
pub mod permission;
pub mod session;

pub use camera::{CameraCapture, CaptureError, CaptureOptions, CaptureResolver, PendingCapture};
pub use capture::{CaptureEvent, CaptureOrchestrator, CapturePolicy, CaptureState, Trigger};
pub use error::OverlayError;
pub use orientation::{
    OrientationConfig, OrientationFeed, OrientationSample, SensorSource, Subscription,
};
pub use permission::{PermissionProvider, PermissionStatus};
pub use session::{OverlaySession, SessionConfig};
