//! Common types shared across device implementations.
//!
//! Reader identification reported by the boot handshake and the indicator
//! colours that operator feedback events map onto.

use crate::error::{HardwareError, Result};
use latchkey_core::FeedbackEvent;
use serde::{Deserialize, Serialize};

/// Tag reader information reported by [`TagReader::self_test`].
///
/// [`TagReader::self_test`]: crate::traits::TagReader::self_test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderInfo {
    /// Reader name (e.g., "MFRC522").
    pub name: String,

    /// Contents of the reader's version register.
    pub firmware_version: u8,
}

impl ReaderInfo {
    /// Build reader info from a raw version register value.
    ///
    /// A register reading of `0x00` or `0xFF` means nothing answered on the
    /// bus (floating or shorted lines), which is reported as a
    /// communication failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_hardware::ReaderInfo;
    ///
    /// let info = ReaderInfo::from_version_register("MFRC522", 0x92).unwrap();
    /// assert_eq!(info.firmware_version, 0x92);
    ///
    /// assert!(ReaderInfo::from_version_register("MFRC522", 0x00).is_err());
    /// assert!(ReaderInfo::from_version_register("MFRC522", 0xFF).is_err());
    /// ```
    pub fn from_version_register(name: impl Into<String>, version: u8) -> Result<Self> {
        let name = name.into();
        if version == 0x00 || version == 0xFF {
            return Err(HardwareError::communication(format!(
                "{} version register read 0x{:02X}; check wiring",
                name, version
            )));
        }
        Ok(Self {
            name,
            firmware_version: version,
        })
    }
}

/// Indicator LED colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LedColor {
    /// LED off.
    Off,

    /// Red LED.
    Red,

    /// Green LED.
    Green,

    /// Blue LED.
    Blue,

    /// Yellow LED.
    Yellow,

    /// Magenta LED.
    Magenta,
}

impl LedColor {
    /// Indicator colour shown after `event`.
    ///
    /// Blue is the idle Normal-mode colour, magenta marks program mode,
    /// green a success and red a refusal or the wipe. Yellow is only seen
    /// while the controller waits for its first admin tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_core::FeedbackEvent;
    /// use latchkey_hardware::LedColor;
    ///
    /// assert_eq!(LedColor::for_event(&FeedbackEvent::EnteredProgramMode), LedColor::Magenta);
    /// assert_eq!(LedColor::for_event(&FeedbackEvent::WipeConfirmed), LedColor::Red);
    /// ```
    pub fn for_event(event: &FeedbackEvent) -> Self {
        match event {
            FeedbackEvent::AwaitingAdmin => Self::Yellow,
            FeedbackEvent::AdminEnrolled(_) | FeedbackEvent::ExitedProgramMode => Self::Blue,
            FeedbackEvent::EnteredProgramMode => Self::Magenta,
            FeedbackEvent::AccessGranted(_)
            | FeedbackEvent::CredentialAdded(_)
            | FeedbackEvent::CredentialRemoved(_) => Self::Green,
            FeedbackEvent::AccessDenied(_)
            | FeedbackEvent::EnrollmentRejected { .. }
            | FeedbackEvent::WipeConfirmed => Self::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_core::{RejectReason, Uid};

    #[test]
    fn test_reader_info_from_register() {
        let info = ReaderInfo::from_version_register("MFRC522", 0x91).unwrap();

        assert_eq!(info.name, "MFRC522");
        assert_eq!(info.firmware_version, 0x91);
    }

    #[test]
    fn test_reader_info_dead_bus() {
        let err = ReaderInfo::from_version_register("MFRC522", 0xFF).unwrap_err();
        assert!(matches!(err, HardwareError::CommunicationError { .. }));
        assert!(err.to_string().contains("0xFF"));
    }

    #[test]
    fn test_led_color_for_events() {
        let uid: Uid = "AA:BB:CC:DD".parse().unwrap();

        assert_eq!(LedColor::for_event(&FeedbackEvent::AwaitingAdmin), LedColor::Yellow);
        assert_eq!(LedColor::for_event(&FeedbackEvent::AdminEnrolled(uid)), LedColor::Blue);
        assert_eq!(LedColor::for_event(&FeedbackEvent::AccessGranted(uid)), LedColor::Green);
        assert_eq!(LedColor::for_event(&FeedbackEvent::AccessDenied(uid)), LedColor::Red);
        assert_eq!(
            LedColor::for_event(&FeedbackEvent::EnrollmentRejected {
                uid,
                reason: RejectReason::StoreFull
            }),
            LedColor::Red
        );
        assert_eq!(LedColor::for_event(&FeedbackEvent::ExitedProgramMode), LedColor::Blue);
    }

    #[test]
    fn test_led_color_serialization() {
        let color = LedColor::Magenta;
        let json = serde_json::to_string(&color).unwrap();
        let deserialized: LedColor = serde_json::from_str(&json).unwrap();
        assert_eq!(color, deserialized);
    }
}
