use snapcube_engine::render::{RenderLoop, RenderOutcome};
use snapcube_engine::scene::Material;
use snapcube_engine::surface::{RenderSurfaceLifecycle, SurfaceHost, SurfaceId};
use snapcube_engine::texture::{DecodeExecutor, RasterBytes, TextureBridge, TextureEvent, TextureId};

use crate::camera::{CameraCapture, CaptureError, CaptureOptions, PendingCapture};
use crate::error::OverlayError;

use super::CaptureState;

/// Platform quirks the capture sequence has to work around.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CapturePolicy {
    /// Rebuild the rendering surface once the photo is in, for camera stacks
    /// that leave the GPU context unusable after a still capture.
    pub recreate_surface_after_capture: bool,
}

/// Result of a capture trigger.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Trigger {
    /// A capture was requested and the mesh shown.
    Started,
    /// A sequence is already in flight; ignored.
    Busy,
    /// Camera permission was refused; ignored.
    Denied,
    /// Nothing to show the mesh on; ignored.
    NoSurface,
}

/// Observable outcome of a capture sequence, reported by `pump`.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// The photo is textured onto the mesh and one frame was rendered.
    TextureApplied {
        texture: TextureId,
        render: RenderOutcome,
    },
    /// The sequence failed and the mesh is back to its pre-capture material.
    Failed(OverlayError),
    /// The surface went away mid-sequence; nothing to apply the photo to.
    Abandoned,
}

/// Material the mesh had before a capture began, for rollback on failure.
#[derive(Debug)]
struct Rollback {
    surface: SurfaceId,
    material: Material,
}

/// Runs one capture sequence at a time.
///
/// `Idle → Capturing → TextureBridging → Rendered → Idle`, with
/// `PermissionDenied` as a dead end. Everything happens on the caller's thread
/// inside `trigger` and `pump`; the camera and the decoder work elsewhere.
pub struct CaptureOrchestrator<C, E> {
    camera: C,
    bridge: TextureBridge<E>,
    options: CaptureOptions,
    policy: CapturePolicy,

    state: CaptureState,
    pending: Option<PendingCapture>,
    rollback: Option<Rollback>,
    captures_requested: u64,
}

impl<C: CameraCapture, E: DecodeExecutor> CaptureOrchestrator<C, E> {
    pub fn new(camera: C, executor: E, options: CaptureOptions, policy: CapturePolicy) -> Self {
        Self {
            camera,
            bridge: TextureBridge::new(executor),
            options,
            policy,
            state: CaptureState::Idle,
            pending: None,
            rollback: None,
            captures_requested: 0,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Capture requests actually sent to the camera.
    pub fn captures_requested(&self) -> u64 {
        self.captures_requested
    }

    pub fn policy(&self) -> CapturePolicy {
        self.policy
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn bridge(&self) -> &TextureBridge<E> {
        &self.bridge
    }

    /// Starts a capture and shows the (still untextured) mesh.
    pub fn trigger<H: SurfaceHost>(&mut self, lifecycle: &mut RenderSurfaceLifecycle<H>) -> Trigger {
        if self.state == CaptureState::PermissionDenied {
            log::debug!("capture trigger ignored: permission denied");
            return Trigger::Denied;
        }
        if self.state.is_busy() {
            log::debug!("capture trigger ignored: {} in progress", self.state);
            return Trigger::Busy;
        }
        let Some(surface) = lifecycle.surface().filter(|s| s.is_valid()) else {
            log::warn!("capture trigger ignored: no active surface");
            return Trigger::NoSurface;
        };
        let Some(scene) = lifecycle.scene_mut() else {
            return Trigger::NoSurface;
        };

        self.pending = Some(self.camera.capture(&self.options));
        self.captures_requested += 1;

        self.rollback = Some(Rollback {
            surface: surface.id(),
            material: scene.mesh().material.clone(),
        });
        scene.set_mesh_visible(true);

        self.transition(CaptureState::Capturing);
        Trigger::Started
    }

    /// Advances the sequence: collects the photo, hands it to the texture
    /// bridge, and applies the decoded texture once it is ready.
    pub fn pump<H: SurfaceHost>(
        &mut self,
        lifecycle: &mut RenderSurfaceLifecycle<H>,
        render_loop: &mut RenderLoop,
    ) -> Vec<CaptureEvent> {
        let mut events = Vec::new();

        if self.state == CaptureState::Rendered {
            self.transition(CaptureState::Idle);
        }

        if self.state == CaptureState::Capturing {
            if let Some(result) = self.pending.as_mut().and_then(PendingCapture::poll) {
                self.pending = None;
                match result {
                    Ok(raster) => {
                        if let Some(event) = self.begin_bridging(lifecycle, render_loop, raster) {
                            events.push(event);
                        }
                    }
                    Err(err) => events.push(self.capture_failed(lifecycle, err)),
                }
            }
        }

        if self.state == CaptureState::TextureBridging {
            for event in self.bridge.pump(lifecycle.active_mut(), render_loop) {
                events.push(self.texture_event(lifecycle, event));
            }
        }

        events
    }

    /// Refuses all further captures.
    pub fn deny_permission(&mut self) {
        self.abort();
        self.transition(CaptureState::PermissionDenied);
    }

    /// Gives up on any sequence in flight. Leaves the mesh as it is.
    pub fn cancel(&mut self) {
        self.abort();
        if self.state != CaptureState::PermissionDenied {
            self.transition(CaptureState::Idle);
        }
    }

    fn abort(&mut self) {
        self.pending = None;
        self.rollback = None;
        self.bridge.cancel();
    }

    fn begin_bridging<H: SurfaceHost>(
        &mut self,
        lifecycle: &mut RenderSurfaceLifecycle<H>,
        render_loop: &mut RenderLoop,
        raster: RasterBytes,
    ) -> Option<CaptureEvent> {
        log::info!("photo captured ({raster:?})");

        if self.policy.recreate_surface_after_capture {
            match lifecycle.force_surface_recreate() {
                Ok(surface) => {
                    render_loop.start(surface.id());
                    // The fresh scene is hidden; the sequence keeps the mesh shown.
                    if let Some(scene) = lifecycle.scene_mut() {
                        self.rollback = Some(Rollback {
                            surface: surface.id(),
                            material: scene.mesh().material.clone(),
                        });
                        scene.set_mesh_visible(true);
                    }
                }
                Err(err) => {
                    log::error!("surface recreate after capture failed: {err}");
                    self.rollback = None;
                    self.transition(CaptureState::Idle);
                    return Some(CaptureEvent::Failed(err.into()));
                }
            }
        }

        let Some(surface) = lifecycle.surface().filter(|s| s.is_valid()) else {
            log::warn!("photo arrived with no active surface; abandoned");
            self.rollback = None;
            self.transition(CaptureState::Idle);
            return Some(CaptureEvent::Abandoned);
        };

        self.bridge.apply_image(surface.id(), raster);
        self.transition(CaptureState::TextureBridging);
        None
    }

    fn capture_failed<H: SurfaceHost>(
        &mut self,
        lifecycle: &mut RenderSurfaceLifecycle<H>,
        err: CaptureError,
    ) -> CaptureEvent {
        log::warn!("{err}");
        self.restore(lifecycle);

        let err = OverlayError::from(err);
        if err == OverlayError::PermissionDenied {
            self.transition(CaptureState::PermissionDenied);
        } else {
            self.transition(CaptureState::Idle);
        }
        CaptureEvent::Failed(err)
    }

    fn texture_event<H: SurfaceHost>(
        &mut self,
        lifecycle: &mut RenderSurfaceLifecycle<H>,
        event: TextureEvent,
    ) -> CaptureEvent {
        match event {
            TextureEvent::Applied {
                texture, render, ..
            } => {
                self.rollback = None;
                self.transition(CaptureState::Rendered);
                CaptureEvent::TextureApplied { texture, render }
            }
            TextureEvent::Failed { error, .. } => {
                self.restore(lifecycle);
                self.transition(CaptureState::Idle);
                CaptureEvent::Failed(error.into())
            }
            TextureEvent::Dropped { .. } => {
                self.rollback = None;
                self.transition(CaptureState::Idle);
                CaptureEvent::Abandoned
            }
        }
    }

    /// Puts the pre-capture material back without rendering.
    fn restore<H: SurfaceHost>(&mut self, lifecycle: &mut RenderSurfaceLifecycle<H>) {
        let rollback = self.rollback.take();
        let current = lifecycle.surface().filter(|s| s.is_valid()).map(|s| s.id());
        let Some(scene) = lifecycle.scene_mut() else { return };

        match rollback {
            Some(r) if current == Some(r.surface) => {
                scene.replace_mesh_material(r.material);
            }
            _ => scene.set_mesh_visible(false),
        }
    }

    fn transition(&mut self, next: CaptureState) {
        if self.state != next {
            log::info!("capture: {} -> {next}", self.state);
            self.state = next;
        }
    }
}
