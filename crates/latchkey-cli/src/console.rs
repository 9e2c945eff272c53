//! Peripherals that exist only as log lines on a development host.

use latchkey_core::FeedbackEvent;
use latchkey_hardware::{DoorActuator, LedColor, OperatorFeedback, Result};
use std::time::Duration;
use tracing::{info, warn};

/// Door strike that logs its movements.
#[derive(Debug)]
pub struct ConsoleDoor {
    locked: bool,
}

impl ConsoleDoor {
    pub fn new() -> Self {
        Self { locked: true }
    }
}

impl DoorActuator for ConsoleDoor {
    async fn unlock(&mut self, duration: Duration) -> Result<()> {
        self.locked = false;
        info!(target: "door", "Unlocked for {} ms", duration.as_millis());
        tokio::time::sleep(duration).await;
        self.lock().await
    }

    async fn lock(&mut self) -> Result<()> {
        if !self.locked {
            info!(target: "door", "Locked");
        }
        self.locked = true;
        Ok(())
    }
}

/// Indicator that logs each event with the colour it would show.
#[derive(Debug, Default)]
pub struct ConsoleFeedback;

impl OperatorFeedback for ConsoleFeedback {
    async fn notify(&mut self, event: &FeedbackEvent) -> Result<()> {
        let color = LedColor::for_event(event);
        if event.is_negative() {
            warn!(target: "feedback", "{} (LED {:?})", event, color);
        } else {
            info!(target: "feedback", "{} (LED {:?})", event, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_door_relocks() {
        let mut door = ConsoleDoor::new();
        let start = tokio::time::Instant::now();

        door.unlock(Duration::from_millis(500)).await.unwrap();

        assert!(door.locked);
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_feedback_never_fails() {
        let mut feedback = ConsoleFeedback;
        feedback.notify(&FeedbackEvent::WipeConfirmed).await.unwrap();
    }
}
