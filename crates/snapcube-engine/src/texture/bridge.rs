use crate::render::{RenderLoop, RenderOutcome};
use crate::scene::Material;
use crate::surface::{ActiveSurface, Drawable, SurfaceId};

use super::{
    CancelToken, CapturedTexture, DecodeError, DecodeExecutor, DecodeJob, RasterBytes, TextureId,
};

/// What happened to the newest `apply_image` request.
///
/// Superseded requests never produce an event.
#[derive(Debug)]
pub enum TextureEvent {
    /// Texture swapped onto the mesh and one render+present attempted.
    Applied {
        generation: u64,
        texture: TextureId,
        render: RenderOutcome,
    },
    /// Decode failed; the mesh material is unchanged.
    Failed { generation: u64, error: DecodeError },
    /// The target surface went away before the decode finished.
    Dropped { generation: u64 },
}

impl TextureEvent {
    pub fn generation(&self) -> u64 {
        match self {
            TextureEvent::Applied { generation, .. }
            | TextureEvent::Failed { generation, .. }
            | TextureEvent::Dropped { generation } => *generation,
        }
    }
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    surface: SurfaceId,
    cancel: CancelToken,
}

/// Turns captured rasters into mesh textures, newest request wins.
///
/// `apply_image` only enqueues; the swap happens in `pump`, on the caller's
/// thread, when the executor reports the decode as finished.
pub struct TextureBridge<E> {
    executor: E,
    latest: u64,
    in_flight: Option<InFlight>,
    last_texture: u64,
}

impl<E: DecodeExecutor> TextureBridge<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            latest: 0,
            in_flight: None,
            last_texture: 0,
        }
    }

    /// Requests that `raster` become the mesh texture of `surface`.
    ///
    /// Cancels any older request still in flight. Returns the request generation.
    pub fn apply_image(&mut self, surface: SurfaceId, raster: RasterBytes) -> u64 {
        if let Some(prev) = self.in_flight.take() {
            prev.cancel.cancel();
            log::debug!("decode #{} superseded", prev.generation);
        }

        self.latest += 1;
        let generation = self.latest;
        let cancel = CancelToken::new();

        log::info!("decode #{generation} queued for {surface} ({raster:?})");
        self.in_flight = Some(InFlight {
            generation,
            surface,
            cancel: cancel.clone(),
        });
        self.executor.submit(DecodeJob {
            generation,
            raster,
            cancel,
        });
        generation
    }

    /// Generation of the request still waiting for its decode, if any.
    pub fn pending(&self) -> Option<u64> {
        self.in_flight.as_ref().map(|f| f.generation)
    }

    /// Cancels the pending request; its result will be ignored.
    pub fn cancel(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            prev.cancel.cancel();
            log::debug!("decode #{} cancelled", prev.generation);
        }
    }

    /// Drains finished decodes and applies the newest one to `target`.
    ///
    /// A successful decode swaps the mesh material and triggers exactly one
    /// `render_once`. Decodes for an older generation, or for a surface that is
    /// no longer the active one, are discarded.
    pub fn pump<D: Drawable>(
        &mut self,
        mut target: Option<&mut ActiveSurface<D>>,
        render_loop: &mut RenderLoop,
    ) -> Vec<TextureEvent> {
        let mut events = Vec::new();

        for done in self.executor.drain() {
            let Some(flight) = self
                .in_flight
                .take_if(|f| f.generation == done.generation)
            else {
                log::debug!("discarding stale decode #{}", done.generation);
                continue;
            };
            let generation = flight.generation;

            let image = match done.result {
                Ok(image) => image,
                Err(error) => {
                    log::warn!("decode #{generation}: {error}; keeping current material");
                    events.push(TextureEvent::Failed { generation, error });
                    continue;
                }
            };

            let Some(active) = target
                .as_deref_mut()
                .filter(|a| a.surface().is_valid() && a.surface().id() == flight.surface)
            else {
                log::debug!("decode #{generation}: {} is gone; dropped", flight.surface);
                events.push(TextureEvent::Dropped { generation });
                continue;
            };

            self.last_texture += 1;
            let texture = TextureId(self.last_texture);
            log::info!(
                "decode #{generation}: {}x{} applied as {texture}",
                image.width,
                image.height
            );

            let texture_material = Material::textured(CapturedTexture::new(texture, image));
            drop(active.scene_mut().replace_mesh_material(texture_material));

            let render = render_loop.render_once(Some(active));
            events.push(TextureEvent::Applied {
                generation,
                texture,
                render,
            });
        }

        events
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }
}
