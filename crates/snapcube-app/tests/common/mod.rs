#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::rc::Rc;
use std::time::Duration;

use crossbeam_channel::{Sender, unbounded};

use snapcube_app::{
    CameraCapture, CaptureError, CaptureOptions, CaptureResolver, OrientationSample,
    PendingCapture, PermissionProvider, PermissionStatus, SensorSource, Subscription,
};
use snapcube_engine::render::RenderError;
use snapcube_engine::scene::Scene;
use snapcube_engine::surface::{Drawable, SurfaceHost, SurfaceId, SurfaceSize};
use snapcube_engine::texture::{RasterBytes, TextureId};

/// One `Drawable::render` call as seen by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub surface: SurfaceId,
    pub texture: Option<TextureId>,
    pub opacity: f32,
    pub aspect: f32,
}

#[derive(Debug, Clone, Default)]
pub struct HostLog {
    pub created: usize,
    pub frames: Vec<Frame>,
    pub presents: usize,
}

#[derive(Default)]
struct HostState {
    viewport: SurfaceSize,
    log: HostLog,
    lose_next_render: bool,
}

/// Recording surface host; clones share the log.
#[derive(Clone, Default)]
pub struct RecordingHost {
    state: Rc<RefCell<HostState>>,
}

impl RecordingHost {
    pub fn new(width: u32, height: u32) -> Self {
        let host = Self::default();
        host.state.borrow_mut().viewport = SurfaceSize::new(width, height);
        host
    }

    pub fn log(&self) -> HostLog {
        self.state.borrow().log.clone()
    }

    pub fn presents(&self) -> usize {
        self.state.borrow().log.presents
    }

    pub fn lose_next_render(&self) {
        self.state.borrow_mut().lose_next_render = true;
    }
}

impl SurfaceHost for RecordingHost {
    type Drawable = RecordingDrawable;

    fn viewport(&self) -> SurfaceSize {
        self.state.borrow().viewport
    }

    fn create_drawable(&mut self, _size: SurfaceSize) -> anyhow::Result<RecordingDrawable> {
        self.state.borrow_mut().log.created += 1;
        Ok(RecordingDrawable {
            state: Rc::clone(&self.state),
            pending: false,
        })
    }
}

pub struct RecordingDrawable {
    state: Rc<RefCell<HostState>>,
    pending: bool,
}

impl Drawable for RecordingDrawable {
    fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.lose_next_render) {
            return Err(RenderError::SurfaceLost("device removed".into()));
        }
        let material = &scene.mesh().material;
        state.log.frames.push(Frame {
            surface: scene.surface(),
            texture: material.texture_id(),
            opacity: material.opacity,
            aspect: scene.camera().aspect,
        });
        self.pending = true;
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if !std::mem::take(&mut self.pending) {
            return Err(RenderError::SkipFrame);
        }
        self.state.borrow_mut().log.presents += 1;
        Ok(())
    }

    fn resize(&mut self, _size: SurfaceSize) {}
}

/// Camera whose captures stay pending until the test resolves them.
#[derive(Clone, Default)]
pub struct ScriptedCamera {
    resolvers: Rc<RefCell<VecDeque<CaptureResolver>>>,
    options: Rc<RefCell<Vec<CaptureOptions>>>,
}

impl ScriptedCamera {
    pub fn requests(&self) -> usize {
        self.options.borrow().len()
    }

    pub fn last_options(&self) -> Option<CaptureOptions> {
        self.options.borrow().last().copied()
    }

    pub fn succeed(&self, raster: RasterBytes) {
        self.next().resolve(Ok(raster));
    }

    pub fn fail(&self, err: CaptureError) {
        self.next().resolve(Err(err));
    }

    fn next(&self) -> CaptureResolver {
        self.resolvers
            .borrow_mut()
            .pop_front()
            .expect("no capture in flight")
    }
}

impl CameraCapture for ScriptedCamera {
    fn capture(&mut self, options: &CaptureOptions) -> PendingCapture {
        let (resolver, pending) = PendingCapture::channel();
        self.resolvers.borrow_mut().push_back(resolver);
        self.options.borrow_mut().push(*options);
        pending
    }
}

pub struct FixedPermission(pub PermissionStatus);

impl PermissionProvider for FixedPermission {
    fn request_permission(&mut self) -> PermissionStatus {
        self.0
    }
}

/// Sensor driven by the test.
#[derive(Default)]
pub struct ManualSensor {
    tx: Option<Sender<OrientationSample>>,
}

impl ManualSensor {
    pub fn emit(&self, x: f32, y: f32, z: f32) {
        let tx = self.tx.as_ref().expect("not subscribed");
        tx.send(OrientationSample::new(x, y, z)).unwrap();
    }
}

impl SensorSource for ManualSensor {
    fn subscribe(&mut self, _interval: Duration) -> Subscription {
        let (tx, rx) = unbounded();
        self.tx = Some(tx);
        Subscription::new(rx)
    }
}

pub fn png(width: u32, height: u32, rgba: [u8; 4]) -> RasterBytes {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    RasterBytes::encoded(out.into_inner())
}
