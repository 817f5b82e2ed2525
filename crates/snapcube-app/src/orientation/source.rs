use std::fmt;
use std::time::Duration;

use crossbeam_channel::Receiver;

use super::OrientationSample;

/// Periodic angular-rate sensor.
pub trait SensorSource {
    /// Starts emitting samples every `interval`.
    fn subscribe(&mut self, interval: Duration) -> Subscription;
}

/// Live sensor subscription. Dropping it unsubscribes.
pub struct Subscription {
    rx: Receiver<OrientationSample>,
    on_drop: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(rx: Receiver<OrientationSample>) -> Self {
        Self { rx, on_drop: None }
    }

    /// Runs `release` when the subscription ends, to stop the platform sensor.
    pub fn with_release(rx: Receiver<OrientationSample>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            rx,
            on_drop: Some(Box::new(release)),
        }
    }

    /// Newest sample received since the last call; older ones are discarded.
    pub(crate) fn latest(&self) -> Option<OrientationSample> {
        self.rx.try_iter().last()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("queued", &self.rx.len())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.on_drop.take() {
            release();
        }
    }
}
