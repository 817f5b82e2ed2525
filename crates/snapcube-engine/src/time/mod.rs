//! Frame timing for the continuous render mode.
//!
//! The default on-demand mode never ticks a clock; only a running continuous
//! loop does, once per presented frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
