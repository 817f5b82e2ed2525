//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! higher layers (the overlay session, the studio binary). Runtime internals
//! stay private; callbacks only see a [`WindowCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::WindowCtx;
