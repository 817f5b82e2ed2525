use crate::scene::{Scene, SceneGraph};

use super::{Drawable, RenderingSurface, SurfaceError, SurfaceHost, SurfaceId, SurfaceSize};

/// The surface, its scene and its drawable, owned together.
///
/// The scene is built for exactly this surface; it is dropped with it.
pub struct ActiveSurface<D> {
    surface: RenderingSurface,
    scene: Scene,
    drawable: D,
}

impl<D: Drawable> ActiveSurface<D> {
    #[inline]
    pub fn surface(&self) -> RenderingSurface {
        self.surface
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Splits borrows for a render pass.
    pub(crate) fn parts_mut(&mut self) -> (&mut RenderingSurface, &mut Scene, &mut D) {
        (&mut self.surface, &mut self.scene, &mut self.drawable)
    }
}

/// Owns creation and destruction of the rendering surface.
///
/// At most one surface is active. Every activation gets a fresh `SurfaceId`, a
/// fresh drawable from the host and a fresh scene.
pub struct RenderSurfaceLifecycle<H: SurfaceHost> {
    host: H,
    graph: SceneGraph,
    last_id: u64,
    active: Option<ActiveSurface<H::Drawable>>,

    /// Last deactivated surface, kept so callers can observe it as invalid.
    retired: Option<RenderingSurface>,
}

impl<H: SurfaceHost> RenderSurfaceLifecycle<H> {
    pub fn new(host: H, graph: SceneGraph) -> Self {
        Self {
            host,
            graph,
            last_id: 0,
            active: None,
            retired: None,
        }
    }

    /// Allocates a surface sized to the host viewport and builds its scene.
    ///
    /// Returns the current surface unchanged if one is already active and valid.
    /// An active surface that went invalid (device loss) is replaced.
    pub fn activate(&mut self) -> Result<RenderingSurface, SurfaceError> {
        if let Some(active) = &self.active {
            if active.surface.is_valid() {
                log::debug!("activate: {} already active", active.surface.id());
                return Ok(active.surface);
            }
            self.deactivate();
        }

        let size = self.host.viewport();
        if size.is_empty() {
            log::error!("activate: host viewport is {size}");
            return Err(SurfaceError::Unavailable(format!("viewport is {size}")));
        }

        let drawable = self.host.create_drawable(size).map_err(|e| {
            log::error!("activate: drawable creation failed: {e:#}");
            SurfaceError::Unavailable(format!("{e:#}"))
        })?;

        self.last_id += 1;
        let id = SurfaceId(self.last_id);
        let surface = RenderingSurface::new(id, size);
        let scene = self.graph.build(id, size.width, size.height);

        self.active = Some(ActiveSurface {
            surface,
            scene,
            drawable,
        });
        self.retired = None;

        log::info!("activated {id} at {size}");
        Ok(surface)
    }

    /// Invalidates and releases the active surface. Idempotent.
    pub fn deactivate(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };

        active.surface.invalidate();
        log::info!("deactivated {}", active.surface.id());
        self.retired = Some(active.surface);
    }

    /// Tears the surface down and builds a new one, scene included.
    ///
    /// Used when the platform GPU context can no longer be trusted (some camera
    /// stacks invalidate it during a still capture).
    pub fn force_surface_recreate(&mut self) -> Result<RenderingSurface, SurfaceError> {
        let previous = self.active.as_ref().map(|a| a.surface.id());
        self.deactivate();
        let surface = self.activate()?;

        match previous {
            Some(prev) => log::info!("recreated {prev} as {}", surface.id()),
            None => log::info!("recreate with nothing active; activated {}", surface.id()),
        }
        Ok(surface)
    }

    /// Applies a new viewport size to the active surface, its drawable and its camera.
    ///
    /// A zero-sized viewport (minimized window) is ignored; the surface keeps its
    /// last non-empty configuration.
    pub fn resize(&mut self, size: SurfaceSize) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if size.is_empty() || size == active.surface.size() {
            return false;
        }

        active.surface.set_size(size);
        active.drawable.resize(size);
        active.scene.resize(size.width, size.height);
        log::debug!("resized {} to {size}", active.surface.id());
        true
    }

    /// Current surface state: the active one, or the last retired (invalid) one.
    pub fn surface(&self) -> Option<RenderingSurface> {
        self.active.as_ref().map(|a| a.surface).or(self.retired)
    }

    /// True when a valid surface is active.
    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.surface.is_valid())
    }

    pub fn active(&self) -> Option<&ActiveSurface<H::Drawable>> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveSurface<H::Drawable>> {
        self.active.as_mut()
    }

    /// Scene of the active surface.
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.active.as_mut().map(|a| &mut a.scene)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    fn lifecycle(w: u32, h: u32) -> (RenderSurfaceLifecycle<FakeHost>, FakeHost) {
        let host = FakeHost::new(SurfaceSize::new(w, h));
        (RenderSurfaceLifecycle::new(host.clone(), SceneGraph::default()), host)
    }

    #[test]
    fn activate_sizes_to_viewport() {
        let (mut lc, host) = lifecycle(1080, 1920);
        let s = lc.activate().unwrap();
        assert!(s.is_valid());
        assert_eq!((s.width(), s.height()), (1080, 1920));
        assert_eq!(host.log().created, 1);
        assert_eq!(lc.active().unwrap().scene().surface(), s.id());
    }

    #[test]
    fn activate_twice_keeps_surface() {
        let (mut lc, host) = lifecycle(10, 10);
        let a = lc.activate().unwrap();
        let b = lc.activate().unwrap();
        assert_eq!(a.id(), b.id());
        assert_eq!(host.log().created, 1);
    }

    #[test]
    fn activate_fails_without_drawable() {
        let (mut lc, host) = lifecycle(10, 10);
        host.set_fail_create(true);
        let err = lc.activate().unwrap_err();
        assert!(matches!(err, SurfaceError::Unavailable(_)));
        assert!(lc.surface().is_none());
    }

    #[test]
    fn activate_fails_on_empty_viewport() {
        let (mut lc, _host) = lifecycle(0, 600);
        assert!(matches!(lc.activate(), Err(SurfaceError::Unavailable(_))));
    }

    #[test]
    fn deactivate_is_idempotent() {
        let (mut lc, _host) = lifecycle(10, 10);
        let s = lc.activate().unwrap();

        lc.deactivate();
        let once = lc.surface();
        lc.deactivate();
        let twice = lc.surface();

        assert_eq!(once, twice);
        let retired = twice.unwrap();
        assert_eq!(retired.id(), s.id());
        assert!(!retired.is_valid());
        assert!(!lc.is_active());
    }

    #[test]
    fn deactivate_without_activation_is_noop() {
        let (mut lc, _host) = lifecycle(10, 10);
        lc.deactivate();
        assert!(lc.surface().is_none());
    }

    #[test]
    fn recreate_yields_new_surface_and_scene() {
        let (mut lc, host) = lifecycle(200, 100);
        let first = lc.activate().unwrap();
        lc.scene_mut().unwrap().set_mesh_visible(true);

        let second = lc.force_surface_recreate().unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(host.log().created, 2);

        let scene = lc.active().unwrap().scene();
        assert_eq!(scene.surface(), second.id());
        assert!(!scene.is_mesh_visible());
    }

    #[test]
    fn resize_reconfigures_camera() {
        let (mut lc, host) = lifecycle(100, 100);
        lc.activate().unwrap();

        assert!(lc.resize(SurfaceSize::new(300, 150)));
        assert!(!lc.resize(SurfaceSize::new(0, 0)));

        let active = lc.active().unwrap();
        assert_eq!(active.surface().size(), SurfaceSize::new(300, 150));
        assert!((active.scene().camera().aspect - 2.0).abs() < 1e-6);
        assert_eq!(host.log().resizes, vec![SurfaceSize::new(300, 150)]);
    }
}
