//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, and exposes the window as
//! a [`SurfaceHost`](crate::surface::SurfaceHost) for the surface lifecycle.

mod host;
mod runtime;

pub use host::WindowHost;
pub use runtime::{Runtime, RuntimeConfig};
