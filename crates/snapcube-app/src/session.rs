use snapcube_engine::render::{RenderLoop, RenderMode, RenderOutcome};
use snapcube_engine::scene::{SceneConfig, SceneGraph};
use snapcube_engine::surface::{RenderSurfaceLifecycle, SurfaceHost, SurfaceSize};
use snapcube_engine::texture::DecodeExecutor;

use crate::camera::{CameraCapture, CaptureOptions};
use crate::capture::{CaptureEvent, CaptureOrchestrator, CapturePolicy, CaptureState, Trigger};
use crate::error::OverlayError;
use crate::orientation::{OrientationConfig, OrientationFeed};
use crate::permission::{PermissionProvider, PermissionStatus};

/// Everything tunable about an overlay session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub scene: SceneConfig,
    pub render_mode: RenderMode,
    pub capture: CaptureOptions,
    pub policy: CapturePolicy,
    pub orientation: OrientationConfig,
}

/// One camera overlay view: surface, scene, capture sequence and sensor readout.
///
/// The rendering side stays inert until camera permission is granted. Blocking
/// failures (permission, surface) are kept as a user-facing message; capture
/// and decode failures are only logged.
pub struct OverlaySession<H: SurfaceHost, C, E> {
    lifecycle: RenderSurfaceLifecycle<H>,
    render_loop: RenderLoop,
    capture: CaptureOrchestrator<C, E>,
    feed: OrientationFeed,

    permission: Option<PermissionStatus>,
    message: Option<String>,
    torn_down: bool,
}

impl<H, C, E> OverlaySession<H, C, E>
where
    H: SurfaceHost,
    C: CameraCapture,
    E: DecodeExecutor,
{
    pub fn new(host: H, camera: C, executor: E, config: SessionConfig) -> Self {
        let SessionConfig {
            scene,
            render_mode,
            capture,
            policy,
            orientation,
        } = config;

        Self {
            lifecycle: RenderSurfaceLifecycle::new(host, SceneGraph::new(scene)),
            render_loop: RenderLoop::new(render_mode),
            capture: CaptureOrchestrator::new(camera, executor, capture, policy),
            feed: OrientationFeed::new(orientation),
            permission: None,
            message: None,
            torn_down: false,
        }
    }

    /// Mounts the view: subscribes the sensor, asks for camera permission and,
    /// when granted, activates the surface and renders the first frame.
    pub fn start<P, S>(&mut self, permission: &mut P, sensor: &mut S) -> Result<(), OverlayError>
    where
        P: PermissionProvider,
        S: crate::orientation::SensorSource,
    {
        self.torn_down = false;
        self.feed.subscribe(sensor);

        let status = permission.request_permission();
        self.permission = Some(status);
        if !status.is_granted() {
            log::warn!("camera permission denied; rendering stays off");
            self.capture.deny_permission();
            return Err(self.fail(OverlayError::PermissionDenied));
        }

        log::info!("camera permission granted");
        self.activate()
    }

    /// Brings the surface back after the platform took it away.
    ///
    /// A torn-down session stays down until `start` is called again.
    pub fn resume(&mut self) -> Result<(), OverlayError> {
        if self.torn_down {
            log::debug!("resume after teardown ignored");
            return Ok(());
        }
        match self.permission {
            Some(PermissionStatus::Granted) => self.activate(),
            Some(PermissionStatus::Denied) => Err(OverlayError::PermissionDenied),
            None => Ok(()),
        }
    }

    /// The platform is taking the surface away; keep everything else.
    pub fn suspend(&mut self) {
        self.render_loop.cancel();
        self.lifecycle.deactivate();
    }

    fn activate(&mut self) -> Result<(), OverlayError> {
        let surface = match self.lifecycle.activate() {
            Ok(s) => s,
            Err(e) => return Err(self.fail(e.into())),
        };
        self.message = None;
        self.render_loop.start(surface.id());
        self.render_loop.render_once(self.lifecycle.active_mut());
        Ok(())
    }

    fn fail(&mut self, err: OverlayError) -> OverlayError {
        if err.is_blocking() {
            self.message = Some(err.user_message());
        }
        err
    }

    pub fn trigger_capture(&mut self) -> Trigger {
        self.capture.trigger(&mut self.lifecycle)
    }

    /// Polls sensor, camera and decoder. Call once per UI tick.
    pub fn pump(&mut self) -> Vec<CaptureEvent> {
        self.feed.pump();

        let events = self.capture.pump(&mut self.lifecycle, &mut self.render_loop);
        for event in &events {
            if let CaptureEvent::Failed(err) = event {
                if err.is_blocking() {
                    self.message = Some(err.user_message());
                }
            }
        }

        self.recover_lost_surface();
        events
    }

    /// Renders for a window-system redraw (expose, resize) or a continuous tick.
    pub fn redraw(&mut self) -> RenderOutcome {
        self.recover_lost_surface();

        let outcome = match self.render_loop.mode() {
            RenderMode::OnDemand => self.render_loop.render_once(self.lifecycle.active_mut()),
            RenderMode::Continuous { .. } => self.render_loop.frame(self.lifecycle.active_mut()),
        };
        if outcome == RenderOutcome::SurfaceLost {
            self.recover_lost_surface();
        }
        outcome
    }

    /// Whether a continuous frame should be scheduled.
    pub fn wants_redraw(&mut self) -> bool {
        self.render_loop.wants_frame(self.lifecycle.surface())
    }

    /// Returns true when the surface took the new size.
    pub fn resize(&mut self, size: SurfaceSize) -> bool {
        self.lifecycle.resize(size)
    }

    /// Unmounts the view: stops capture, rendering and the sensor. Idempotent.
    pub fn teardown(&mut self) {
        self.capture.cancel();
        self.render_loop.cancel();
        self.lifecycle.deactivate();
        self.feed.unsubscribe();
        self.torn_down = true;
    }

    /// Replaces an active surface the drawable reported as lost.
    fn recover_lost_surface(&mut self) {
        let lost = self
            .lifecycle
            .active()
            .is_some_and(|a| !a.surface().is_valid());
        if !lost {
            return;
        }

        log::warn!("rendering surface lost; recreating");
        self.capture.cancel();
        if let Err(err) = self.activate() {
            log::error!("surface recovery failed: {err}");
        }
    }

    /// Blocking message for the user, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn readout(&self) -> String {
        self.feed.readout()
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    pub fn lifecycle(&self) -> &RenderSurfaceLifecycle<H> {
        &self.lifecycle
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub fn orchestrator(&self) -> &CaptureOrchestrator<C, E> {
        &self.capture
    }

    pub fn orchestrator_mut(&mut self) -> &mut CaptureOrchestrator<C, E> {
        &mut self.capture
    }

    pub fn feed(&self) -> &OrientationFeed {
        &self.feed
    }
}
