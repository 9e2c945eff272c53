//! Semantic feedback events emitted by the controller.
//!
//! The controller never drives a display or buzzer directly. It reports what
//! happened as a [`FeedbackEvent`] and lets the operator feedback device
//! decide how to render it (LCD text, LED color, beep pattern, log line).

use crate::types::Uid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a credential mutation requested from program mode was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No free slot left in the credential store.
    StoreFull,
    /// The identifier is already stored.
    AlreadyExists,
    /// The identifier is not stored.
    NotFound,
    /// The identifier does not fit the configured record width.
    InvalidUid,
    /// The durable storage itself failed.
    StorageFault,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RejectReason::StoreFull => "store full",
            RejectReason::AlreadyExists => "already enrolled",
            RejectReason::NotFound => "not enrolled",
            RejectReason::InvalidUid => "invalid identifier",
            RejectReason::StorageFault => "storage fault",
        };
        f.write_str(reason)
    }
}

/// Events reported to the operator feedback device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum FeedbackEvent {
    /// No admin tag is defined yet; the next scan becomes the admin.
    AwaitingAdmin,

    /// The scanned tag was stored as the admin tag.
    AdminEnrolled(Uid),

    /// Known tag in normal mode, strike unlocked.
    AccessGranted(Uid),

    /// Unknown tag in normal mode.
    AccessDenied(Uid),

    /// Tag added to the credential store from program mode.
    CredentialAdded(Uid),

    /// Tag removed from the credential store from program mode.
    CredentialRemoved(Uid),

    /// A program-mode add or remove could not be applied.
    EnrollmentRejected { uid: Uid, reason: RejectReason },

    /// Admin scan switched from normal to program mode.
    EnteredProgramMode,

    /// Admin scan switched from program mode back to normal.
    ExitedProgramMode,

    /// The wipe button was held long enough; storage erased, controller halted.
    WipeConfirmed,
}

impl FeedbackEvent {
    /// Returns `true` for events that report a refusal or a failure.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            FeedbackEvent::AccessDenied(_) | FeedbackEvent::EnrollmentRejected { .. }
        )
    }
}

impl fmt::Display for FeedbackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackEvent::AwaitingAdmin => write!(f, "No admin tag defined, scan one to enroll"),
            FeedbackEvent::AdminEnrolled(uid) => write!(f, "Admin tag enrolled: {uid}"),
            FeedbackEvent::AccessGranted(uid) => write!(f, "Access granted: {uid}"),
            FeedbackEvent::AccessDenied(uid) => write!(f, "Access denied: {uid}"),
            FeedbackEvent::CredentialAdded(uid) => write!(f, "Tag added: {uid}"),
            FeedbackEvent::CredentialRemoved(uid) => write!(f, "Tag removed: {uid}"),
            FeedbackEvent::EnrollmentRejected { uid, reason } => {
                write!(f, "Tag {uid} rejected: {reason}")
            }
            FeedbackEvent::EnteredProgramMode => write!(f, "Program mode"),
            FeedbackEvent::ExitedProgramMode => write!(f, "Normal mode"),
            FeedbackEvent::WipeConfirmed => write!(f, "Storage wiped, restart required"),
        }
    }
}
