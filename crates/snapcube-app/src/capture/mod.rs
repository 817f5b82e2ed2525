//! The user-triggered "take photo → show mesh → texture it → render" sequence.

mod orchestrator;
mod state;

pub use orchestrator::{CaptureEvent, CaptureOrchestrator, CapturePolicy, Trigger};
pub use state::CaptureState;
