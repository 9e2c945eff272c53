//! Wipe-button hold detection.
//!
//! The button is sampled once per poll, so the hold is measured from the
//! first sample that saw it pressed to the current sample. A single released
//! sample restarts the measurement.

use std::time::Duration;
use tokio::time::Instant;

/// Confirms a continuous press of at least `threshold`.
///
/// # Examples
///
/// ```
/// use latchkey_controller::HoldDetector;
/// use std::time::Duration;
/// use tokio::time::Instant;
///
/// let mut detector = HoldDetector::new(Duration::from_secs(3));
/// let start = Instant::now();
///
/// assert!(!detector.sample(true, start));
/// assert!(!detector.sample(true, start + Duration::from_secs(2)));
/// assert!(detector.sample(true, start + Duration::from_secs(3)));
///
/// // fires once per press
/// assert!(!detector.sample(true, start + Duration::from_secs(4)));
/// ```
#[derive(Debug, Clone)]
pub struct HoldDetector {
    threshold: Duration,
    held_since: Option<Instant>,
    fired: bool,
}

impl HoldDetector {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            held_since: None,
            fired: false,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Feed one button sample taken at `now`.
    ///
    /// Returns `true` exactly once per press, on the first sample at which
    /// the button has been held for the threshold.
    pub fn sample(&mut self, held: bool, now: Instant) -> bool {
        if !held {
            self.reset();
            return false;
        }

        let since = *self.held_since.get_or_insert(now);
        if self.fired || now.saturating_duration_since(since) < self.threshold {
            return false;
        }

        self.fired = true;
        true
    }

    /// How long the current press has lasted at `now`.
    pub fn held_for(&self, now: Instant) -> Option<Duration> {
        self.held_since
            .map(|since| now.saturating_duration_since(since))
    }

    /// Forget the current press.
    pub fn reset(&mut self) {
        self.held_since = None;
        self.fired = false;
    }
}
