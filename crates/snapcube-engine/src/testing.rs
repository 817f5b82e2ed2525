//! Test doubles for the surface host, drawables and decode executor.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::rc::Rc;

use crate::render::RenderError;
use crate::scene::Scene;
use crate::surface::{Drawable, SurfaceHost, SurfaceId, SurfaceSize};
use crate::texture::{
    DecodeCompletion, DecodeExecutor, DecodeJob, ImageDecoder, RasterDecoder, TextureId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderRecord {
    pub surface: SurfaceId,
    pub texture: Option<TextureId>,
    pub opacity: f32,
}

#[derive(Debug, Clone, Default)]
pub struct DrawLog {
    pub created: usize,
    pub renders: Vec<RenderRecord>,
    pub presents: usize,
    pub resizes: Vec<SurfaceSize>,
}

#[derive(Default)]
struct FakeState {
    viewport: SurfaceSize,
    log: DrawLog,
    fail_create: bool,
    fail_render: Option<RenderError>,
}

/// Host whose drawables record into a shared log. Clones share state.
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Rc<RefCell<FakeState>>,
}

impl FakeHost {
    pub fn new(viewport: SurfaceSize) -> Self {
        let host = Self::default();
        host.state.borrow_mut().viewport = viewport;
        host
    }

    pub fn log(&self) -> DrawLog {
        self.state.borrow().log.clone()
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.state.borrow_mut().fail_create = fail;
    }

    pub fn fail_next_render(&self, err: RenderError) {
        self.state.borrow_mut().fail_render = Some(err);
    }
}

impl SurfaceHost for FakeHost {
    type Drawable = FakeDrawable;

    fn viewport(&self) -> SurfaceSize {
        self.state.borrow().viewport
    }

    fn create_drawable(&mut self, _size: SurfaceSize) -> anyhow::Result<FakeDrawable> {
        let mut state = self.state.borrow_mut();
        anyhow::ensure!(!state.fail_create, "no drawable available");
        state.log.created += 1;
        Ok(FakeDrawable {
            state: Rc::clone(&self.state),
            pending: false,
        })
    }
}

pub struct FakeDrawable {
    state: Rc<RefCell<FakeState>>,
    pending: bool,
}

impl Drawable for FakeDrawable {
    fn render(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.fail_render.take() {
            return Err(err);
        }
        let material = &scene.mesh().material;
        state.log.renders.push(RenderRecord {
            surface: scene.surface(),
            texture: material.texture_id(),
            opacity: material.opacity,
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

    fn resize(&mut self, size: SurfaceSize) {
        self.state.borrow_mut().log.resizes.push(size);
    }
}

/// Executor that holds jobs until the test completes them, in any order.
///
/// `complete` decodes even when the job was cancelled, so late stale
/// completions reach the bridge.
#[derive(Default)]
pub struct ManualExecutor {
    pending: Vec<DecodeJob>,
    done: VecDeque<DecodeCompletion>,
}

impl ManualExecutor {
    pub fn complete(&mut self, generation: u64) {
        let Some(idx) = self.pending.iter().position(|j| j.generation == generation) else {
            panic!("no pending job for generation {generation}");
        };
        let job = self.pending.remove(idx);
        let result = job
            .raster
            .into_encoded()
            .and_then(|bytes| RasterDecoder::default().decode(&bytes));
        self.done.push_back(DecodeCompletion { generation, result });
    }

    pub fn cancelled(&self) -> Vec<u64> {
        self.pending
            .iter()
            .filter(|j| j.cancel.is_cancelled())
            .map(|j| j.generation)
            .collect()
    }
}

impl DecodeExecutor for ManualExecutor {
    fn submit(&mut self, job: DecodeJob) {
        self.pending.push(job);
    }

    fn drain(&mut self) -> Vec<DecodeCompletion> {
        self.done.drain(..).collect()
    }
}

/// Encodes a solid `width`x`height` PNG.
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("png encode");
    out.into_inner()
}
