use crate::surface::{ActiveSurface, Drawable, RenderingSurface, SurfaceId};
use crate::time::FrameClock;

use super::RenderError;

/// How frames get scheduled.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum RenderMode {
    /// Render only when asked: on surface creation and after a texture swap.
    #[default]
    OnDemand,
    /// Render every frame while running, spinning the mesh at `spin` rad/s.
    Continuous { spin: f32 },
}

/// Result of one render attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Presented,
    /// No surface is active.
    NoSurface,
    /// The surface was invalidated (deactivated or lost).
    InvalidSurface,
    /// The scene was built for another surface.
    StaleScene,
    /// Transient swapchain hiccup; nothing presented.
    Skipped,
    /// The drawable reported the surface lost; it is now invalid.
    SurfaceLost,
}

impl RenderOutcome {
    #[inline]
    pub fn is_presented(&self) -> bool {
        matches!(self, RenderOutcome::Presented)
    }
}

/// Drives render + present against the current surface/scene pair.
#[derive(Debug, Default)]
pub struct RenderLoop {
    mode: RenderMode,
    /// Surface a continuous loop is bound to; `None` when not scheduling.
    running: Option<SurfaceId>,
    clock: FrameClock,
    presented: u64,
}

impl RenderLoop {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Total frames presented through this loop.
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Renders `target`'s scene once and presents it.
    ///
    /// A missing, invalid or mismatched surface is a no-op, not an error.
    pub fn render_once<D: Drawable>(
        &mut self,
        target: Option<&mut ActiveSurface<D>>,
    ) -> RenderOutcome {
        let Some(active) = target else {
            return RenderOutcome::NoSurface;
        };
        let (surface, scene, drawable) = active.parts_mut();

        if !surface.is_valid() {
            return RenderOutcome::InvalidSurface;
        }
        if scene.surface() != surface.id() {
            log::warn!(
                "refusing to render scene of {} on {}",
                scene.surface(),
                surface.id()
            );
            return RenderOutcome::StaleScene;
        }

        match drawable.render(scene).and_then(|()| drawable.present()) {
            Ok(()) => {
                self.presented += 1;
                RenderOutcome::Presented
            }
            Err(RenderError::SkipFrame) => {
                log::debug!("{}: frame skipped", surface.id());
                RenderOutcome::Skipped
            }
            Err(RenderError::SurfaceLost(reason)) => {
                log::error!("{} lost: {reason}", surface.id());
                surface.invalidate();
                if self.running == Some(surface.id()) {
                    self.running = None;
                }
                RenderOutcome::SurfaceLost
            }
        }
    }

    /// Starts scheduling frames for `surface`. No-op in on-demand mode.
    pub fn start(&mut self, surface: SurfaceId) {
        if let RenderMode::Continuous { .. } = self.mode {
            self.running = Some(surface);
            self.clock.reset();
            log::debug!("continuous rendering started on {surface}");
        }
    }

    /// Stops scheduling. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(surface) = self.running.take() {
            log::debug!("continuous rendering stopped on {surface}");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Whether another continuous frame should be scheduled against `current`.
    ///
    /// Stops the loop as soon as the bound surface is no longer the current,
    /// valid one.
    pub fn wants_frame(&mut self, current: Option<RenderingSurface>) -> bool {
        let Some(bound) = self.running else {
            return false;
        };
        let alive = current.is_some_and(|s| s.is_valid() && s.id() == bound);
        if !alive {
            self.cancel();
        }
        alive
    }

    /// Advances animation and renders one continuous frame.
    pub fn frame<D: Drawable>(&mut self, target: Option<&mut ActiveSurface<D>>) -> RenderOutcome {
        let current = target.as_ref().map(|a| a.surface());
        if !self.wants_frame(current) {
            return RenderOutcome::NoSurface;
        }
        let Some(active) = target else {
            return RenderOutcome::NoSurface;
        };

        let ft = self.clock.tick();
        if let RenderMode::Continuous { spin } = self.mode {
            let scene = active.scene_mut();
            let angle = scene.mesh().rotation_y + spin * ft.dt;
            scene.set_mesh_rotation(angle);
        }
        self.render_once(Some(active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;
    use crate::surface::{RenderSurfaceLifecycle, SurfaceSize};
    use crate::testing::FakeHost;

    fn active_lifecycle() -> (RenderSurfaceLifecycle<FakeHost>, FakeHost) {
        let host = FakeHost::new(SurfaceSize::new(640, 480));
        let mut lc = RenderSurfaceLifecycle::new(host.clone(), SceneGraph::default());
        lc.activate().unwrap();
        (lc, host)
    }

    #[test]
    fn renders_and_presents_once() {
        let (mut lc, host) = active_lifecycle();
        let mut rl = RenderLoop::default();

        assert_eq!(rl.render_once(lc.active_mut()), RenderOutcome::Presented);
        let log = host.log();
        assert_eq!(log.renders.len(), 1);
        assert_eq!(log.presents, 1);
        assert_eq!(rl.frames_presented(), 1);
    }

    #[test]
    fn no_surface_is_noop() {
        let (mut lc, host) = active_lifecycle();
        lc.deactivate();
        let mut rl = RenderLoop::default();

        assert_eq!(rl.render_once(lc.active_mut()), RenderOutcome::NoSurface);
        assert_eq!(host.log().presents, 0);
    }

    #[test]
    fn transient_error_skips_frame() {
        let (mut lc, host) = active_lifecycle();
        host.fail_next_render(RenderError::SkipFrame);
        let mut rl = RenderLoop::default();

        assert_eq!(rl.render_once(lc.active_mut()), RenderOutcome::Skipped);
        assert!(lc.is_active());
        assert_eq!(rl.render_once(lc.active_mut()), RenderOutcome::Presented);
    }

    #[test]
    fn lost_surface_is_invalidated_then_ignored() {
        let (mut lc, host) = active_lifecycle();
        host.fail_next_render(RenderError::SurfaceLost("device removed".into()));
        let mut rl = RenderLoop::default();

        assert_eq!(rl.render_once(lc.active_mut()), RenderOutcome::SurfaceLost);
        assert!(!lc.is_active());
        assert_eq!(rl.render_once(lc.active_mut()), RenderOutcome::InvalidSurface);
        assert_eq!(host.log().presents, 0);

        // Activation replaces the lost surface.
        let fresh = lc.activate().unwrap();
        assert!(fresh.is_valid());
        assert_eq!(rl.render_once(lc.active_mut()), RenderOutcome::Presented);
    }

    #[test]
    fn on_demand_never_schedules() {
        let (lc, _host) = active_lifecycle();
        let mut rl = RenderLoop::default();
        rl.start(lc.surface().unwrap().id());
        assert!(!rl.is_running());
        assert!(!rl.wants_frame(lc.surface()));
    }

    #[test]
    fn continuous_spins_and_stops_on_deactivate() {
        let (mut lc, host) = active_lifecycle();
        let mut rl = RenderLoop::new(RenderMode::Continuous { spin: 1.0 });
        rl.start(lc.surface().unwrap().id());

        assert!(rl.wants_frame(lc.surface()));
        assert_eq!(rl.frame(lc.active_mut()), RenderOutcome::Presented);
        assert!(lc.active().unwrap().scene().mesh().rotation_y > 0.0);

        lc.deactivate();
        assert!(!rl.wants_frame(lc.surface()));
        assert!(!rl.is_running());
        assert_eq!(rl.frame(lc.active_mut()), RenderOutcome::NoSurface);
        assert_eq!(host.log().presents, 1);
    }

    #[test]
    fn continuous_stops_on_recreate() {
        let (mut lc, _host) = active_lifecycle();
        let mut rl = RenderLoop::new(RenderMode::Continuous { spin: 0.5 });
        rl.start(lc.surface().unwrap().id());

        lc.force_surface_recreate().unwrap();
        assert!(!rl.wants_frame(lc.surface()));
    }
}
