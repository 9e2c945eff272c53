//! Program-mode state machine.
//!
//! The controller is either in `Normal` mode (scans open the door or are
//! refused) or in `Enrollment` mode (scans add or remove credentials). Only
//! the admin tag moves between the two; there is no timeout back to
//! `Normal`.
//!
//! # Examples
//!
//! ```
//! use latchkey_controller::{ProgramMode, ProgramModeMachine};
//!
//! let mut machine = ProgramModeMachine::new();
//! assert_eq!(machine.current(), ProgramMode::Normal);
//!
//! let transition = machine.toggle();
//! assert_eq!(transition.to, ProgramMode::Enrollment);
//! assert_eq!(machine.current(), ProgramMode::Enrollment);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tokio::time::Instant;

/// Maximum number of mode transitions to keep in history.
const MAX_HISTORY_SIZE: usize = 100;

/// Operating mode of the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramMode {
    /// Scans are checked against the credential store.
    #[default]
    Normal,

    /// Scans add unknown tags and remove known ones.
    Enrollment,
}

impl ProgramMode {
    /// The mode an admin scan switches to.
    ///
    /// ```
    /// use latchkey_controller::ProgramMode;
    ///
    /// assert_eq!(ProgramMode::Normal.toggled(), ProgramMode::Enrollment);
    /// assert_eq!(ProgramMode::Enrollment.toggled(), ProgramMode::Normal);
    /// ```
    pub fn toggled(self) -> Self {
        match self {
            ProgramMode::Normal => ProgramMode::Enrollment,
            ProgramMode::Enrollment => ProgramMode::Normal,
        }
    }

    pub fn is_enrollment(self) -> bool {
        self == ProgramMode::Enrollment
    }
}

impl fmt::Display for ProgramMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramMode::Normal => write!(f, "Normal"),
            ProgramMode::Enrollment => write!(f, "Enrollment"),
        }
    }
}

/// A single mode change with timestamp.
///
/// The `timestamp` field is not serialized; a deserialized transition is
/// stamped with the time of deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeTransition {
    /// Mode left.
    pub from: ProgramMode,

    /// Mode entered.
    pub to: ProgramMode,

    /// When the change happened.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl ModeTransition {
    pub fn new(from: ProgramMode, to: ProgramMode) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }
}

/// Tracks the current program mode and its recent history.
///
/// Mode is volatile: a restarted controller is always in `Normal` mode.
#[derive(Debug)]
pub struct ProgramModeMachine {
    current: ProgramMode,

    /// Recent transitions, oldest first (limited to MAX_HISTORY_SIZE).
    history: VecDeque<ModeTransition>,
}

impl ProgramModeMachine {
    /// Create a machine in `Normal` mode.
    pub fn new() -> Self {
        Self {
            current: ProgramMode::Normal,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current(&self) -> ProgramMode {
        self.current
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<ModeTransition> {
        &self.history
    }

    /// Switch to the other mode.
    pub fn toggle(&mut self) -> ModeTransition {
        self.change_to(self.current.toggled())
    }

    /// Force `Normal` mode.
    ///
    /// Returns `None` if already in `Normal` mode.
    pub fn reset(&mut self) -> Option<ModeTransition> {
        (self.current != ProgramMode::Normal).then(|| self.change_to(ProgramMode::Normal))
    }

    fn change_to(&mut self, mode: ProgramMode) -> ModeTransition {
        let transition = ModeTransition::new(self.current, mode);

        self.current = mode;

        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        transition
    }
}

impl Default for ProgramModeMachine {
    fn default() -> Self {
        Self::new()
    }
}
