//! The control loop.
//!
//! [`Controller`] ties the state to the four peripherals. Each iteration
//! samples the wipe button, then asks the reader for a newly presented tag
//! and acts on it. Scan handling, door movement and feedback run to
//! completion before the next sample is taken.

use crate::authorization::Action;
use crate::config::ControllerConfig;
use crate::error::{ControllerError, ControllerResult};
use crate::hold::HoldDetector;
use crate::mode::ProgramMode;
use crate::state::ControllerState;
use latchkey_core::{FeedbackEvent, RejectReason, Uid};
use latchkey_hardware::{DoorActuator, OperatorFeedback, ReaderInfo, TagReader, WipeButton};
use latchkey_storage::{DurableStorage, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Lifecycle phase of a [`Controller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Created, `boot` not yet run.
    Booting,

    /// No admin tag: the next scan becomes the admin.
    AwaitingAdmin,

    /// Normal operation.
    Running,

    /// Storage wiped; restart required.
    Halted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Booting => write!(f, "Booting"),
            Phase::AwaitingAdmin => write!(f, "AwaitingAdmin"),
            Phase::Running => write!(f, "Running"),
            Phase::Halted => write!(f, "Halted"),
        }
    }
}

/// Result of handling one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// First boot: the scanned tag is now the admin.
    AdminEnrolled(Uid),

    /// The action was carried out.
    Performed(Action),

    /// The store refused the change; nothing was modified.
    Rejected { uid: Uid, reason: RejectReason },
}

/// Result of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Nothing happened.
    Idle,

    /// A tag was presented and handled.
    Scanned(Outcome),

    /// The wipe hold was confirmed; the controller is now halted.
    Wiped,
}

/// Single-door access controller.
///
/// Generic over the storage device and the four peripherals, so the same
/// loop drives mocks in tests and real drivers on the door.
///
/// # Examples
///
/// ```
/// use latchkey_controller::{Controller, ControllerConfig, Phase, Poll};
/// use latchkey_core::Uid;
/// use latchkey_hardware::mock::{MockButton, MockDoor, MockFeedback, MockReader};
/// use latchkey_storage::backend::MemoryStorage;
/// use tokio::time::Instant;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (reader, tags) = MockReader::new();
///     let (door, _door) = MockDoor::new();
///     let (feedback, _feedback) = MockFeedback::new();
///     let (button, _button) = MockButton::new();
///
///     let mut controller = Controller::new(
///         ControllerConfig::default(),
///         MemoryStorage::erased(1024),
///         reader,
///         door,
///         feedback,
///         button,
///     )?;
///     controller.boot().await?;
///     assert_eq!(controller.phase(), Phase::AwaitingAdmin);
///
///     let admin: Uid = "AA:BB:CC:DD".parse()?;
///     tags.tap(admin).await?;
///     controller.poll(Instant::now()).await?;
///     assert_eq!(controller.phase(), Phase::Running);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Controller<S, R, D, F, B> {
    config: ControllerConfig,
    state: ControllerState<S>,
    phase: Phase,
    hold: HoldDetector,
    reader: R,
    door: D,
    feedback: F,
    button: B,
}

impl<S, R, D, F, B> Controller<S, R, D, F, B>
where
    S: DurableStorage,
    R: TagReader,
    D: DoorActuator,
    F: OperatorFeedback,
    B: WipeButton,
{
    /// Assemble a controller. Nothing touches the hardware until
    /// [`boot`](Self::boot).
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or the storage is too small
    /// for a single record.
    pub fn new(
        config: ControllerConfig,
        storage: S,
        reader: R,
        door: D,
        feedback: F,
        button: B,
    ) -> ControllerResult<Self> {
        config.validate()?;
        let state = ControllerState::new(storage, config.uid_length)?;
        let hold = HoldDetector::new(config.wipe_hold);

        Ok(Self {
            config,
            state,
            phase: Phase::Booting,
            hold,
            reader,
            door,
            feedback,
            button,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> ProgramMode {
        self.state.mode()
    }

    pub fn state(&self) -> &ControllerState<S> {
        &self.state
    }

    /// Release the storage device.
    pub fn into_storage(self) -> S {
        self.state.into_storage()
    }

    /// Bring the controller up.
    ///
    /// Runs the reader handshake, checks the storage bookkeeping, locks the
    /// door and picks the phase: `AwaitingAdmin` (announced with
    /// `FeedbackEvent::AwaitingAdmin`) when no admin is defined, `Running`
    /// otherwise.
    ///
    /// Without an admin the credential store is formatted, since no
    /// credential can be enrolled before the admin exists. Corrupt
    /// bookkeeping next to a defined admin is reported, not repaired.
    ///
    /// # Errors
    ///
    /// - `ControllerError::ReaderComms` if the reader does not answer
    /// - `ControllerError::Storage` for storage faults
    /// - `ControllerError::Halted` after a wipe
    pub async fn boot(&mut self) -> ControllerResult<ReaderInfo> {
        if self.phase == Phase::Halted {
            return Err(ControllerError::Halted);
        }

        let info = self.reader.self_test().await.map_err(|err| {
            error!("Reader handshake failed: {}", err);
            ControllerError::ReaderComms(err)
        })?;
        info!(
            "Reader {} ready (firmware 0x{:02X})",
            info.name, info.firmware_version
        );

        let admin_defined = self.state.admin().is_defined()?;
        if admin_defined {
            if let Err(err) = self.state.credentials().check_integrity() {
                error!("Storage integrity check failed: {}", err);
                return Err(err.into());
            }
        } else {
            // credentials are only ever added under an admin
            if let Err(err) = self.state.credentials().check_integrity() {
                warn!("Storage is not formatted ({}); formatting", err);
            }
            self.state.credentials_mut().format()?;
        }

        self.door.lock().await?;

        if admin_defined {
            let count = self.state.credentials().count()?;
            info!(
                "{} credential(s) stored, capacity {}",
                count,
                self.state.credentials().capacity()
            );
            self.phase = Phase::Running;
        } else {
            info!("No admin tag defined; scan a tag to enroll it as admin");
            self.phase = Phase::AwaitingAdmin;
            self.feedback.notify(&FeedbackEvent::AwaitingAdmin).await?;
        }

        Ok(info)
    }

    /// Handle one presented tag.
    ///
    /// In `AwaitingAdmin` the tag becomes the admin. In `Running` the
    /// authorization decision is applied: mode toggles, credential changes,
    /// grants (feedback, then the door opens for the unlock duration) and
    /// denials. A change the store refuses is reported as
    /// `FeedbackEvent::EnrollmentRejected` and returned as
    /// [`Outcome::Rejected`] with state unchanged.
    pub async fn handle_scan(&mut self, uid: Uid) -> ControllerResult<Outcome> {
        match self.phase {
            Phase::Booting => Err(ControllerError::NotBooted),
            Phase::Halted => Err(ControllerError::Halted),
            Phase::AwaitingAdmin => self.enroll_admin(uid).await,
            Phase::Running => self.authorize(uid).await,
        }
    }

    async fn enroll_admin(&mut self, uid: Uid) -> ControllerResult<Outcome> {
        match self.state.admin_mut().define(&uid) {
            Ok(()) => {
                info!("Admin tag enrolled: {}", uid);
                self.phase = Phase::Running;
                self.feedback
                    .notify(&FeedbackEvent::AdminEnrolled(uid))
                    .await?;
                Ok(Outcome::AdminEnrolled(uid))
            }
            Err(err) => self.reject(uid, err).await,
        }
    }

    async fn authorize(&mut self, uid: Uid) -> ControllerResult<Outcome> {
        let action = self.state.decide(&uid)?;
        debug!("Scan {}: {}", uid, action);

        match self.state.apply(&action) {
            Ok(_) => {}
            Err(ControllerError::Storage(err)) => return self.reject(uid, err).await,
            Err(err) => return Err(err),
        }

        match action {
            Action::ToggleProgramMode { to } => info!("Program mode: {}", to),
            Action::GrantCredential { uid } => info!("Credential added: {}", uid),
            Action::RevokeCredential { uid } => info!("Credential removed: {}", uid),
            Action::Grant { uid } => info!("Access granted: {}", uid),
            Action::Deny { uid } => warn!("Access denied: {}", uid),
        }

        self.feedback.notify(&action.feedback()).await?;
        if action.unlocks_door() {
            self.door.unlock(self.config.unlock_duration).await?;
        }

        Ok(Outcome::Performed(action))
    }

    async fn reject(&mut self, uid: Uid, err: StorageError) -> ControllerResult<Outcome> {
        if !err.is_recoverable() {
            error!("Storage failure while handling {}: {}", uid, err);
            return Err(err.into());
        }

        let reason = err.reject_reason();
        warn!("Rejected {}: {}", uid, err);
        self.feedback
            .notify(&FeedbackEvent::EnrollmentRejected { uid, reason })
            .await?;
        Ok(Outcome::Rejected { uid, reason })
    }

    /// Erase the device and halt.
    ///
    /// Every byte of storage is zeroed (records, count, admin UID, admin
    /// marker), `FeedbackEvent::WipeConfirmed` is emitted and the controller
    /// refuses all further work until restarted.
    pub async fn wipe(&mut self) -> ControllerResult<()> {
        if self.phase == Phase::Halted {
            return Err(ControllerError::Halted);
        }

        self.state.wipe()?;
        self.phase = Phase::Halted;
        warn!("Storage wiped; restart required");

        self.door.lock().await?;
        self.feedback.notify(&FeedbackEvent::WipeConfirmed).await?;
        Ok(())
    }

    /// Run one loop iteration at `now`: sample the wipe button, then read
    /// the reader.
    pub async fn poll(&mut self, now: Instant) -> ControllerResult<Poll> {
        match self.phase {
            Phase::Booting => return Err(ControllerError::NotBooted),
            Phase::Halted => return Err(ControllerError::Halted),
            Phase::AwaitingAdmin | Phase::Running => {}
        }

        let held = self.button.is_held().await?;
        if held && self.hold.held_for(now).is_none() {
            debug!("Wipe button pressed");
        }
        if self.hold.sample(held, now) {
            warn!(
                "Wipe button held for {:?}; wiping storage",
                self.hold.threshold()
            );
            self.wipe().await?;
            return Ok(Poll::Wiped);
        }

        match self.reader.try_read_uid().await? {
            Some(uid) => Ok(Poll::Scanned(self.handle_scan(uid).await?)),
            None => Ok(Poll::Idle),
        }
    }

    /// Boot if needed, then poll every `poll_interval` until the storage is
    /// wiped.
    ///
    /// Transient peripheral errors are logged and the loop continues; fatal
    /// ones are returned.
    pub async fn run(&mut self) -> ControllerResult<()> {
        if self.phase == Phase::Booting {
            self.boot().await?;
        }

        loop {
            match self.poll(Instant::now()).await {
                Ok(Poll::Wiped) => return Ok(()),
                Ok(_) => {}
                Err(err) if !err.is_fatal() => warn!("Poll failed: {}", err),
                Err(err) => {
                    error!("Controller stopped: {}", err);
                    return Err(err);
                }
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
