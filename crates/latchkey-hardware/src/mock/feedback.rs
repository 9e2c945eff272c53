//! Mock operator feedback that records every event.

use crate::{Result, traits::OperatorFeedback, types::LedColor};
use latchkey_core::FeedbackEvent;
use tokio::sync::mpsc;

/// Mock indicator: keeps the current LED colour and forwards each event to
/// its [`MockFeedbackHandle`].
///
/// # Examples
///
/// ```
/// use latchkey_core::FeedbackEvent;
/// use latchkey_hardware::LedColor;
/// use latchkey_hardware::mock::MockFeedback;
/// use latchkey_hardware::traits::OperatorFeedback;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut feedback, mut handle) = MockFeedback::new();
///
///     feedback.notify(&FeedbackEvent::EnteredProgramMode).await?;
///
///     assert_eq!(feedback.led_color(), LedColor::Magenta);
///     assert_eq!(handle.events(), &[FeedbackEvent::EnteredProgramMode]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockFeedback {
    event_tx: mpsc::UnboundedSender<FeedbackEvent>,
    led_color: LedColor,
}

impl MockFeedback {
    /// Create a new mock feedback device with the LED off.
    pub fn new() -> (Self, MockFeedbackHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let feedback = Self {
            event_tx,
            led_color: LedColor::Off,
        };
        let handle = MockFeedbackHandle {
            event_rx,
            history: Vec::new(),
        };
        (feedback, handle)
    }

    /// Get the current LED color.
    pub fn led_color(&self) -> LedColor {
        self.led_color
    }
}

impl OperatorFeedback for MockFeedback {
    async fn notify(&mut self, event: &FeedbackEvent) -> Result<()> {
        self.led_color = LedColor::for_event(event);
        let _ = self.event_tx.send(*event);
        Ok(())
    }
}

/// Observes a [`MockFeedback`].
#[derive(Debug)]
pub struct MockFeedbackHandle {
    event_rx: mpsc::UnboundedReceiver<FeedbackEvent>,
    history: Vec<FeedbackEvent>,
}

impl MockFeedbackHandle {
    /// Every event notified so far, oldest first.
    pub fn events(&mut self) -> &[FeedbackEvent] {
        while let Ok(event) = self.event_rx.try_recv() {
            self.history.push(event);
        }
        &self.history
    }

    /// The most recent event.
    pub fn last(&mut self) -> Option<FeedbackEvent> {
        self.events().last().copied()
    }

    /// Events notified since the previous call.
    pub fn take(&mut self) -> Vec<FeedbackEvent> {
        self.events();
        std::mem::take(&mut self.history)
    }

    /// Colour of the indicator after the most recent event.
    pub fn led_color(&mut self) -> LedColor {
        self.last()
            .map_or(LedColor::Off, |event| LedColor::for_event(&event))
    }
}
