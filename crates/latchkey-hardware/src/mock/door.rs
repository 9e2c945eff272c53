//! Mock door strike.

use crate::{Result, traits::DoorActuator};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Something the mock strike did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorEvent {
    /// Strike released for the given duration.
    Unlocked(Duration),
    /// Strike engaged.
    Locked,
}

/// Mock door strike.
///
/// `unlock` really waits for the unlock duration (use a paused tokio clock
/// in tests) and reports each transition to its [`MockDoorHandle`].
#[derive(Debug)]
pub struct MockDoor {
    event_tx: mpsc::UnboundedSender<DoorEvent>,
    locked: bool,
}

impl MockDoor {
    /// Create a new mock door, initially locked.
    pub fn new() -> (Self, MockDoorHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let door = Self {
            event_tx,
            locked: true,
        };
        let handle = MockDoorHandle {
            event_rx,
            history: Vec::new(),
        };
        (door, handle)
    }

    /// Returns `true` while the strike is engaged.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn report(&self, event: DoorEvent) {
        // nobody watching is fine
        let _ = self.event_tx.send(event);
    }
}

impl DoorActuator for MockDoor {
    async fn unlock(&mut self, duration: Duration) -> Result<()> {
        debug!("Door unlocked for {:?}", duration);
        self.locked = false;
        self.report(DoorEvent::Unlocked(duration));

        tokio::time::sleep(duration).await;

        self.lock().await
    }

    async fn lock(&mut self) -> Result<()> {
        self.locked = true;
        self.report(DoorEvent::Locked);
        Ok(())
    }
}

/// Observes a [`MockDoor`].
#[derive(Debug)]
pub struct MockDoorHandle {
    event_rx: mpsc::UnboundedReceiver<DoorEvent>,
    history: Vec<DoorEvent>,
}

impl MockDoorHandle {
    /// Every event the door has reported so far.
    pub fn events(&mut self) -> &[DoorEvent] {
        while let Ok(event) = self.event_rx.try_recv() {
            self.history.push(event);
        }
        &self.history
    }

    /// Durations of every unlock so far.
    pub fn unlocks(&mut self) -> Vec<Duration> {
        self.events()
            .iter()
            .filter_map(|event| match event {
                DoorEvent::Unlocked(duration) => Some(*duration),
                DoorEvent::Locked => None,
            })
            .collect()
    }

    /// Returns `true` unless the last reported event was an unlock.
    pub fn is_locked(&mut self) -> bool {
        !matches!(self.events().last(), Some(DoorEvent::Unlocked(_)))
    }

    /// Forget the recorded history.
    pub fn clear(&mut self) {
        self.events();
        self.history.clear();
    }
}
