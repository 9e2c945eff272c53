//! Control logic for the Latchkey single-door access controller.
//!
//! A tag scan is turned into exactly one [`Action`] by the pure
//! [`decide`] function, from three inputs: the program mode
//! ([`ProgramModeMachine`]), the admin registry and the credential store
//! (both held in [`ControllerState`]). The [`Controller`] applies the action
//! and drives the door and operator feedback through the
//! `latchkey-hardware` traits.
//!
//! Holding the wipe button for [`ControllerConfig::wipe_hold`] erases the
//! device and halts the controller ([`HoldDetector`]).

pub mod authorization;
pub mod config;
pub mod controller;
pub mod error;
pub mod hold;
pub mod mode;
pub mod state;

pub use authorization::{Action, decide};
pub use config::ControllerConfig;
pub use controller::{Controller, Outcome, Phase, Poll};
pub use error::{ControllerError, ControllerResult};
pub use hold::HoldDetector;
pub use mode::{ModeTransition, ProgramMode, ProgramModeMachine};
pub use state::ControllerState;
