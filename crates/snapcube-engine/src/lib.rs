//! snapcube engine crate.
//!
//! Owns the GPU-facing half of snapcube: the rendering surface lifecycle, the
//! single-mesh scene, the captured-image texture bridge and the on-demand render
//! loop. Platform glue (winit window, wgpu device) lives here too so that higher
//! layers only see the `SurfaceHost` / `Drawable` seams.

pub mod device;
pub mod surface;
pub mod scene;
pub mod texture;
pub mod render;
pub mod window;
pub mod core;
pub mod time;

pub mod logging;

#[cfg(test)]
mod testing;
