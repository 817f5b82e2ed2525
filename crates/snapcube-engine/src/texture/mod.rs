//! Captured-image → GPU texture bridge.
//!
//! Raster bytes are decoded off the UI thread by a `DecodeExecutor`; completed
//! decodes are drained on the UI thread, wrapped in a `CapturedTexture`, swapped
//! onto the mesh and rendered once. Only the newest request may land.

mod bridge;
mod captured;
mod decode;
mod job;
mod raster;
mod worker;

pub use bridge::{TextureBridge, TextureEvent};
pub use captured::{CapturedTexture, TextureId};
pub use decode::{DecodeError, DecodedImage, ImageDecoder, RasterDecoder, WhiteToAlpha};
pub use job::{CancelToken, DecodeCompletion, DecodeExecutor, DecodeJob, InlineExecutor};
pub use raster::RasterBytes;
pub use worker::DecodeWorker;
