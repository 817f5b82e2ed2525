use std::time::Duration;

use super::sample::display_value;
use super::{OrientationSample, SensorSource, Subscription};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OrientationConfig {
    /// Sensor sampling period.
    pub interval: Duration,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
        }
    }
}

/// Keeps only the newest angular-rate sample.
///
/// Samples do not feed back into rendering; they are read for display.
#[derive(Debug, Default)]
pub struct OrientationFeed {
    config: OrientationConfig,
    subscription: Option<Subscription>,
    latest: Option<OrientationSample>,
}

impl OrientationFeed {
    pub fn new(config: OrientationConfig) -> Self {
        Self {
            config,
            subscription: None,
            latest: None,
        }
    }

    /// Subscribes to `source`, replacing any previous subscription.
    pub fn subscribe<S: SensorSource>(&mut self, source: &mut S) {
        self.subscription = None;
        self.subscription = Some(source.subscribe(self.config.interval));
        log::debug!("orientation feed subscribed every {:?}", self.config.interval);
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Takes in whatever arrived since the last pump. Returns true on a new sample.
    pub fn pump(&mut self) -> bool {
        let Some(sample) = self.subscription.as_ref().and_then(Subscription::latest) else {
            return false;
        };
        self.latest = Some(sample);
        true
    }

    pub fn latest(&self) -> Option<OrientationSample> {
        self.latest
    }

    pub fn display_x(&self) -> f32 {
        display_value(self.latest.map(|s| s.x))
    }

    pub fn display_y(&self) -> f32 {
        display_value(self.latest.map(|s| s.y))
    }

    pub fn display_z(&self) -> f32 {
        display_value(self.latest.map(|s| s.z))
    }

    /// Label for the capture control.
    pub fn readout(&self) -> String {
        format!("Render as 3D {}", self.display_x())
    }

    /// Releases the sensor. The last sample stays readable. Idempotent.
    pub fn unsubscribe(&mut self) {
        if self.subscription.take().is_some() {
            log::debug!("orientation feed unsubscribed");
        }
    }
}
