//! Everything the controller knows: durable storage plus the volatile
//! program mode.

use crate::authorization::{Action, decide};
use crate::error::ControllerResult;
use crate::mode::{ModeTransition, ProgramMode, ProgramModeMachine};
use latchkey_core::Uid;
use latchkey_storage::{AdminRegistry, CredentialStore, DurableStorage, ReadStorage, StoreLayout};

/// Storage, layout and program mode, passed explicitly wherever a decision
/// is made.
#[derive(Debug)]
pub struct ControllerState<S> {
    storage: S,
    layout: StoreLayout,
    mode: ProgramModeMachine,
}

impl<S: ReadStorage> ControllerState<S> {
    /// Wrap `storage` with `uid_length`-byte records, in `Normal` mode.
    pub fn new(storage: S, uid_length: usize) -> ControllerResult<Self> {
        let layout = StoreLayout::for_storage(&storage, uid_length)?;
        Ok(Self {
            storage,
            layout,
            mode: ProgramModeMachine::new(),
        })
    }

    pub fn layout(&self) -> StoreLayout {
        self.layout
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Current program mode.
    pub fn mode(&self) -> ProgramMode {
        self.mode.current()
    }

    pub fn mode_machine(&self) -> &ProgramModeMachine {
        &self.mode
    }

    /// Read-only view of the credential store.
    pub fn credentials(&self) -> CredentialStore<&S> {
        CredentialStore::new(&self.storage, self.layout)
    }

    /// Read-only view of the admin registry.
    pub fn admin(&self) -> AdminRegistry<&S> {
        AdminRegistry::new(&self.storage, self.layout)
    }

    /// Decide what scanning `uid` does in the current state.
    pub fn decide(&self, uid: &Uid) -> ControllerResult<Action> {
        decide(uid, self.mode(), &self.admin(), &self.credentials())
    }
}

impl<S: DurableStorage> ControllerState<S> {
    pub fn credentials_mut(&mut self) -> CredentialStore<&mut S> {
        CredentialStore::new(&mut self.storage, self.layout)
    }

    pub fn admin_mut(&mut self) -> AdminRegistry<&mut S> {
        AdminRegistry::new(&mut self.storage, self.layout)
    }

    /// Carry out the state change of `action`.
    ///
    /// Toggles the mode or adds/removes a credential; `Grant` and `Deny`
    /// change nothing. Returns the mode transition, if any. On error the
    /// state is unchanged.
    pub fn apply(&mut self, action: &Action) -> ControllerResult<Option<ModeTransition>> {
        match *action {
            Action::ToggleProgramMode { to } => {
                debug_assert_eq!(to, self.mode.current().toggled());
                Ok(Some(self.mode.toggle()))
            }
            Action::GrantCredential { uid } => {
                self.credentials_mut().add(&uid)?;
                Ok(None)
            }
            Action::RevokeCredential { uid } => {
                self.credentials_mut().remove(&uid)?;
                Ok(None)
            }
            Action::Grant { .. } | Action::Deny { .. } => Ok(None),
        }
    }

    /// Zero the whole device and return to `Normal` mode.
    pub fn wipe(&mut self) -> ControllerResult<()> {
        self.credentials_mut().wipe_all()?;
        self.mode.reset();
        Ok(())
    }
}
