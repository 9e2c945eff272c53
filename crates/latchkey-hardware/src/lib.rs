//! Peripheral abstraction layer for the Latchkey door controller.
//!
//! The controller talks to four peripherals: a contactless tag reader, the
//! door strike, an operator-feedback channel (indicator LED, buzzer or log)
//! and a wipe push-button. Each is a trait, so mock devices used in tests and
//! on a development host can be swapped for real drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//!
//! # Reading tags
//!
//! ```no_run
//! use latchkey_hardware::traits::{OperatorFeedback, TagReader};
//! use latchkey_hardware::error::Result;
//! use latchkey_core::FeedbackEvent;
//!
//! async fn greet_tags<R: TagReader, F: OperatorFeedback>(
//!     reader: &mut R,
//!     feedback: &mut F,
//! ) -> Result<()> {
//!     reader.self_test().await?;
//!     while let Some(uid) = reader.try_read_uid().await? {
//!         feedback.notify(&FeedbackEvent::AccessGranted(uid)).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides a `(device, handle)` pair per peripheral. The
//! device goes to the controller; the handle presents tags, presses the
//! button and inspects what the door and indicator did.

pub mod error;
pub mod mock;
pub mod presence;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use presence::PresenceTracker;
pub use traits::{DoorActuator, OperatorFeedback, TagReader, WipeButton};
pub use types::{LedColor, ReaderInfo};
