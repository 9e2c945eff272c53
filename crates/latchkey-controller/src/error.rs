//! Error types for the control loop.

use latchkey_hardware::HardwareError;
use latchkey_storage::StorageError;
use thiserror::Error;

/// Errors raised by the controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The reader failed its boot handshake
    #[error("Tag reader did not answer: {0}")]
    ReaderComms(#[source] HardwareError),

    /// A scan needs an admin tag but none is enrolled
    #[error("No admin tag defined")]
    AdminUndefined,

    /// `boot` has not completed
    #[error("Controller has not booted")]
    NotBooted,

    /// Storage was wiped; only a restart leaves this state
    #[error("Controller halted after wipe; restart required")]
    Halted,

    /// Durable storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Peripheral failure after boot
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    /// Invalid configuration
    #[error(transparent)]
    Core(#[from] latchkey_core::Error),
}

impl ControllerError {
    /// Returns `true` if the control loop cannot continue after this error.
    ///
    /// Transient peripheral glitches (a timeout, a garbled frame) are not
    /// fatal; the loop logs them and polls again.
    pub fn is_fatal(&self) -> bool {
        match self {
            ControllerError::Hardware(err) => !err.is_transient(),
            ControllerError::Storage(err) => !err.is_recoverable(),
            _ => true,
        }
    }
}

/// Specialized result type for controller operations
pub type ControllerResult<T> = Result<T, ControllerError>;
