//! Latest angular-rate sample, for display only.

mod feed;
mod sample;
mod source;

pub use feed::{OrientationConfig, OrientationFeed};
pub use sample::OrientationSample;
pub use source::{SensorSource, Subscription};
