//! Peripheral trait definitions.
//!
//! The controller reaches the outside world only through these traits: a tag
//! reader, the door strike, operator feedback (LED, buzzer, log) and the wipe
//! button. Mock and real implementations are interchangeable.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::ReaderInfo;
use latchkey_core::{FeedbackEvent, Uid};
use std::time::Duration;

/// Contactless tag reader.
///
/// # Object Safety and Dynamic Dispatch
///
/// This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters:
///
/// ```no_run
/// use latchkey_hardware::traits::TagReader;
/// use latchkey_hardware::error::Result;
///
/// async fn wait_for_tag<R: TagReader>(reader: &mut R) -> Result<latchkey_core::Uid> {
///     loop {
///         if let Some(uid) = reader.try_read_uid().await? {
///             return Ok(uid);
///         }
///         tokio::time::sleep(std::time::Duration::from_millis(50)).await;
///     }
/// }
/// ```
pub trait TagReader: Send + Sync {
    /// Handshake with the reader at boot.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::CommunicationError` if the reader does not
    /// answer. The controller treats this as fatal.
    async fn self_test(&mut self) -> Result<ReaderInfo>;

    /// Non-blocking read of a newly presented tag.
    ///
    /// Returns `Ok(None)` when no new tag is in the field. A tag resting on
    /// the reader is reported once per presentation (see
    /// [`PresenceTracker`](crate::presence::PresenceTracker)).
    async fn try_read_uid(&mut self) -> Result<Option<Uid>>;
}

/// Electric door strike or relay.
///
/// The door is locked unless an `unlock` is in progress.
pub trait DoorActuator: Send + Sync {
    /// Release the door for `duration`, then lock it again.
    ///
    /// Completes when the door is locked again.
    async fn unlock(&mut self, duration: Duration) -> Result<()>;

    /// Lock the door.
    async fn lock(&mut self) -> Result<()>;
}

/// Operator-visible feedback (indicator LED, buzzer, display, log).
///
/// Implementations decide how an event is rendered; see
/// [`LedColor::for_event`](crate::types::LedColor::for_event) for the
/// indicator colours.
pub trait OperatorFeedback: Send + Sync {
    /// Render `event`.
    async fn notify(&mut self, event: &FeedbackEvent) -> Result<()>;
}

/// Momentary push-button sampled for the wipe gesture.
pub trait WipeButton: Send + Sync {
    /// Returns `true` while the button is pressed.
    async fn is_held(&mut self) -> Result<bool>;
}
