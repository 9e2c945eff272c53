//! Authorization engine.
//!
//! [`decide`] maps a scanned UID to exactly one [`Action`] from the program
//! mode, the admin registry and the credential store. It reads storage but
//! never writes it; applying the action is the caller's job, and every
//! feedback event and door movement follows from the returned action.

use crate::error::{ControllerError, ControllerResult};
use crate::mode::ProgramMode;
use latchkey_core::{FeedbackEvent, Uid};
use latchkey_storage::{AdminRegistry, CredentialStore, ReadStorage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a scan should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// The admin tag was scanned: switch program mode.
    ToggleProgramMode { to: ProgramMode },

    /// Enrollment mode, unknown tag: add it.
    GrantCredential { uid: Uid },

    /// Enrollment mode, known tag: remove it.
    RevokeCredential { uid: Uid },

    /// Normal mode, known tag: open the door.
    Grant { uid: Uid },

    /// Normal mode, unknown tag: keep the door shut.
    Deny { uid: Uid },
}

impl Action {
    /// Feedback event announcing that the action was carried out.
    ///
    /// # Examples
    ///
    /// ```
    /// use latchkey_controller::{Action, ProgramMode};
    /// use latchkey_core::FeedbackEvent;
    ///
    /// let action = Action::ToggleProgramMode { to: ProgramMode::Enrollment };
    /// assert_eq!(action.feedback(), FeedbackEvent::EnteredProgramMode);
    /// ```
    pub fn feedback(&self) -> FeedbackEvent {
        match *self {
            Action::ToggleProgramMode {
                to: ProgramMode::Enrollment,
            } => FeedbackEvent::EnteredProgramMode,
            Action::ToggleProgramMode {
                to: ProgramMode::Normal,
            } => FeedbackEvent::ExitedProgramMode,
            Action::GrantCredential { uid } => FeedbackEvent::CredentialAdded(uid),
            Action::RevokeCredential { uid } => FeedbackEvent::CredentialRemoved(uid),
            Action::Grant { uid } => FeedbackEvent::AccessGranted(uid),
            Action::Deny { uid } => FeedbackEvent::AccessDenied(uid),
        }
    }

    /// Returns `true` if the door must be released.
    pub fn unlocks_door(&self) -> bool {
        matches!(self, Action::Grant { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ToggleProgramMode { to } => write!(f, "switch to {} mode", to),
            Action::GrantCredential { uid } => write!(f, "enroll {}", uid),
            Action::RevokeCredential { uid } => write!(f, "revoke {}", uid),
            Action::Grant { uid } => write!(f, "grant {}", uid),
            Action::Deny { uid } => write!(f, "deny {}", uid),
        }
    }
}

/// Decide what scanning `uid` does.
///
/// 1. No admin defined: `ControllerError::AdminUndefined`.
/// 2. `uid` is the admin: toggle program mode.
/// 3. Enrollment mode: revoke a stored UID, otherwise enroll it.
/// 4. Normal mode: grant a stored UID, otherwise deny it.
///
/// The admin check comes first, so the admin tag is never enrolled as an
/// ordinary credential through this path.
///
/// # Examples
///
/// ```
/// use latchkey_controller::{Action, ProgramMode, decide};
/// use latchkey_core::Uid;
/// use latchkey_storage::{AdminRegistry, CredentialStore, StoreLayout};
/// use latchkey_storage::backend::MemoryStorage;
///
/// let mut storage = MemoryStorage::new(64);
/// let layout = StoreLayout::for_storage(&storage, 4).unwrap();
/// let admin: Uid = "AA:BB:CC:DD".parse().unwrap();
/// AdminRegistry::new(&mut storage, layout).define(&admin).unwrap();
///
/// let tag: Uid = "11:22:33:44".parse().unwrap();
/// let action = decide(
///     &tag,
///     ProgramMode::Normal,
///     &AdminRegistry::new(&storage, layout),
///     &CredentialStore::new(&storage, layout),
/// )
/// .unwrap();
/// assert_eq!(action, Action::Deny { uid: tag });
/// ```
pub fn decide<A, C>(
    uid: &Uid,
    mode: ProgramMode,
    admin: &AdminRegistry<A>,
    store: &CredentialStore<C>,
) -> ControllerResult<Action>
where
    A: ReadStorage,
    C: ReadStorage,
{
    if !admin.is_defined()? {
        return Err(ControllerError::AdminUndefined);
    }

    if admin.is_admin(uid)? {
        return Ok(Action::ToggleProgramMode { to: mode.toggled() });
    }

    let known = store.contains(uid)?;
    let uid = *uid;
    Ok(match (mode, known) {
        (ProgramMode::Enrollment, true) => Action::RevokeCredential { uid },
        (ProgramMode::Enrollment, false) => Action::GrantCredential { uid },
        (ProgramMode::Normal, true) => Action::Grant { uid },
        (ProgramMode::Normal, false) => Action::Deny { uid },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_storage::StoreLayout;
    use latchkey_storage::backend::MemoryStorage;
    use rstest::rstest;

    const ADMIN: &str = "AA:BB:CC:DD";
    const KNOWN: &str = "11:22:33:44";
    const UNKNOWN: &str = "55:66:77:88";

    fn uid(text: &str) -> Uid {
        text.parse().unwrap()
    }

    fn provisioned() -> (MemoryStorage, StoreLayout) {
        let mut storage = MemoryStorage::new(64);
        let layout = StoreLayout::for_storage(&storage, 4).unwrap();
        AdminRegistry::new(&mut storage, layout)
            .define(&uid(ADMIN))
            .unwrap();
        CredentialStore::new(&mut storage, layout)
            .add(&uid(KNOWN))
            .unwrap();
        (storage, layout)
    }

    fn decide_on(
        storage: &MemoryStorage,
        layout: StoreLayout,
        scanned: &str,
        mode: ProgramMode,
    ) -> ControllerResult<Action> {
        decide(
            &uid(scanned),
            mode,
            &AdminRegistry::new(storage, layout),
            &CredentialStore::new(storage, layout),
        )
    }

    #[rstest]
    #[case(ADMIN, ProgramMode::Normal, Action::ToggleProgramMode { to: ProgramMode::Enrollment })]
    #[case(ADMIN, ProgramMode::Enrollment, Action::ToggleProgramMode { to: ProgramMode::Normal })]
    #[case(KNOWN, ProgramMode::Normal, Action::Grant { uid: uid(KNOWN) })]
    #[case(UNKNOWN, ProgramMode::Normal, Action::Deny { uid: uid(UNKNOWN) })]
    #[case(KNOWN, ProgramMode::Enrollment, Action::RevokeCredential { uid: uid(KNOWN) })]
    #[case(UNKNOWN, ProgramMode::Enrollment, Action::GrantCredential { uid: uid(UNKNOWN) })]
    fn test_decision_table(
        #[case] scanned: &str,
        #[case] mode: ProgramMode,
        #[case] expected: Action,
    ) {
        let (storage, layout) = provisioned();
        assert_eq!(decide_on(&storage, layout, scanned, mode).unwrap(), expected);
    }

    #[test]
    fn test_admin_undefined() {
        let storage = MemoryStorage::new(64);
        let layout = StoreLayout::for_storage(&storage, 4).unwrap();

        let result = decide_on(&storage, layout, KNOWN, ProgramMode::Normal);
        assert!(matches!(result, Err(ControllerError::AdminUndefined)));
    }

    #[test]
    fn test_decide_does_not_write() {
        let (storage, layout) = provisioned();
        let writes = storage.write_count();

        for mode in [ProgramMode::Normal, ProgramMode::Enrollment] {
            for scanned in [ADMIN, KNOWN, UNKNOWN] {
                decide_on(&storage, layout, scanned, mode).unwrap();
            }
        }

        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn test_feedback_mapping() {
        let tag = uid(KNOWN);
        assert_eq!(
            Action::ToggleProgramMode { to: ProgramMode::Normal }.feedback(),
            FeedbackEvent::ExitedProgramMode
        );
        assert_eq!(
            Action::GrantCredential { uid: tag }.feedback(),
            FeedbackEvent::CredentialAdded(tag)
        );
        assert_eq!(
            Action::RevokeCredential { uid: tag }.feedback(),
            FeedbackEvent::CredentialRemoved(tag)
        );
        assert_eq!(
            Action::Grant { uid: tag }.feedback(),
            FeedbackEvent::AccessGranted(tag)
        );
        assert_eq!(
            Action::Deny { uid: tag }.feedback(),
            FeedbackEvent::AccessDenied(tag)
        );
    }

    #[test]
    fn test_action_properties() {
        let tag = uid(KNOWN);
        assert!(Action::Grant { uid: tag }.unlocks_door());
        assert!(!Action::Deny { uid: tag }.unlocks_door());
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&Action::Grant { uid: uid(KNOWN) }).unwrap();
        assert_eq!(json, r#"{"action":"grant","uid":"11:22:33:44"}"#);
    }
}
