//! Rendering surface lifecycle.
//!
//! A rendering surface is created on activation, torn down on deactivation, and
//! can be rebuilt from scratch through `force_surface_recreate`. Each surface
//! carries its own `Scene`; nothing GPU-bound survives a recreation.

mod error;
mod handle;
mod host;
mod lifecycle;

pub use error::SurfaceError;
pub use handle::{RenderingSurface, SurfaceId, SurfaceSize};
pub use host::{Drawable, SurfaceHost};
pub use lifecycle::{ActiveSurface, RenderSurfaceLifecycle};
