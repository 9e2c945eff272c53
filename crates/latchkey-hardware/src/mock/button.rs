//! Mock wipe button.

use crate::{Result, traits::WipeButton};
use tokio::sync::watch;

/// Mock push-button whose state is set through a [`MockButtonHandle`].
#[derive(Debug)]
pub struct MockButton {
    state: watch::Receiver<bool>,
}

impl MockButton {
    /// Create a new released button.
    pub fn new() -> (Self, MockButtonHandle) {
        let (state_tx, state) = watch::channel(false);
        (Self { state }, MockButtonHandle { state: state_tx })
    }
}

impl WipeButton for MockButton {
    async fn is_held(&mut self) -> Result<bool> {
        Ok(*self.state.borrow())
    }
}

/// Presses and releases a [`MockButton`].
#[derive(Debug)]
pub struct MockButtonHandle {
    state: watch::Sender<bool>,
}

impl MockButtonHandle {
    pub fn press(&self) {
        self.state.send_replace(true);
    }

    pub fn release(&self) {
        self.state.send_replace(false);
    }

    pub fn is_pressed(&self) -> bool {
        *self.state.borrow()
    }
}
