//! Peripheral failures.
//!
//! Only a lost device is permanent. A missed poll window or a garbled
//! anticollision frame clears up on the next poll.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors reported by the reader, strike, indicator and wipe button.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The peripheral is gone (bus unplugged, channel closed).
    #[error("{device} disconnected")]
    Disconnected { device: String },

    /// The peripheral did not answer within `duration_ms`.
    #[error("No answer within {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The bus answered with something other than a valid register value.
    #[error("Bus fault: {message}")]
    CommunicationError { message: String },

    /// A frame arrived but failed its checks.
    #[error("Bad frame: {message}")]
    InvalidData { message: String },
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Returns `true` if polling again may succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, HardwareError::Disconnected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            HardwareError::disconnected("MFRC522").to_string(),
            "MFRC522 disconnected"
        );
        assert_eq!(
            HardwareError::timeout(25).to_string(),
            "No answer within 25ms"
        );
        assert_eq!(
            HardwareError::communication("version register reads 0x00").to_string(),
            "Bus fault: version register reads 0x00"
        );
        assert_eq!(
            HardwareError::invalid_data("BCC mismatch").to_string(),
            "Bad frame: BCC mismatch"
        );
    }

    #[test]
    fn test_only_disconnection_is_permanent() {
        assert!(!HardwareError::disconnected("door").is_transient());
        assert!(HardwareError::timeout(25).is_transient());
        assert!(HardwareError::communication("0xFF").is_transient());
        assert!(HardwareError::invalid_data("CRC").is_transient());
    }
}
