//! Mock tag reader for testing and development.
//!
//! Tags enter and leave the simulated field through a [`MockReaderHandle`];
//! the reader applies the same one-read-per-presentation rule as a real
//! polled reader.

use crate::{
    HardwareError, Result,
    presence::PresenceTracker,
    traits::TagReader,
    types::ReaderInfo,
};
use latchkey_core::Uid;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

/// Version register value reported by a healthy mock (MFRC522 v2.0).
pub const MOCK_FIRMWARE_VERSION: u8 = 0x92;

/// A one-shot read failure a [`MockReader`] can be told to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderFault {
    /// The card did not answer the request in time.
    Timeout,

    /// The anticollision frame failed its check byte.
    Garbled,
}

impl ReaderFault {
    fn into_error(self) -> HardwareError {
        match self {
            ReaderFault::Timeout => HardwareError::timeout(25),
            ReaderFault::Garbled => HardwareError::invalid_data("anticollision BCC mismatch"),
        }
    }
}

/// Mock tag reader.
///
/// # Examples
///
/// ```
/// use latchkey_core::Uid;
/// use latchkey_hardware::mock::MockReader;
/// use latchkey_hardware::traits::TagReader;
///
/// #[tokio::main]
/// async fn main() -> latchkey_hardware::Result<()> {
///     let (mut reader, handle) = MockReader::new();
///     let tag: Uid = "04:AB:CD:EF".parse().unwrap();
///
///     handle.present(tag).await?;
///     assert_eq!(reader.try_read_uid().await?, Some(tag));
///
///     // Still on the reader: not reported again
///     assert_eq!(reader.try_read_uid().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReader {
    /// Channel receiver for field events
    event_rx: mpsc::Receiver<FieldEvent>,

    /// Device name
    name: String,

    /// Simulated version register, shared with the handle
    version: Arc<AtomicU8>,

    tracker: PresenceTracker,

    /// New presentations not yet returned
    pending: VecDeque<Uid>,
}

impl MockReader {
    /// Create a new mock reader with the default name.
    pub fn new() -> (Self, MockReaderHandle) {
        Self::with_name("Mock MFRC522")
    }

    /// Create a new mock reader with a custom name.
    pub fn with_name(name: impl Into<String>) -> (Self, MockReaderHandle) {
        let name = name.into();
        let (event_tx, event_rx) = mpsc::channel(32);
        let version = Arc::new(AtomicU8::new(MOCK_FIRMWARE_VERSION));

        let reader = Self {
            event_rx,
            name: name.clone(),
            version: Arc::clone(&version),
            tracker: PresenceTracker::new(),
            pending: VecDeque::new(),
        };

        let handle = MockReaderHandle {
            event_tx,
            name,
            version,
        };

        (reader, handle)
    }

    fn check_bus(&self) -> Result<ReaderInfo> {
        ReaderInfo::from_version_register(&self.name, self.version.load(Ordering::Relaxed))
    }
}

impl TagReader for MockReader {
    async fn self_test(&mut self) -> Result<ReaderInfo> {
        self.check_bus()
    }

    async fn try_read_uid(&mut self) -> Result<Option<Uid>> {
        self.check_bus()?;

        loop {
            match self.event_rx.try_recv() {
                Ok(FieldEvent::Entered(uid)) => {
                    if let Some(uid) = self.tracker.observe(Some(uid)) {
                        debug!("{}: tag {} entered the field", self.name, uid);
                        self.pending.push_back(uid);
                    }
                }
                Ok(FieldEvent::Left) => {
                    self.tracker.observe(None);
                }
                Ok(FieldEvent::Fault(fault)) => {
                    debug!("{}: injected {:?}", self.name, fault);
                    return Err(fault.into_error());
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if self.pending.is_empty() {
                        return Err(HardwareError::disconnected(self.name.clone()));
                    }
                    break;
                }
            }
        }

        Ok(self.pending.pop_front())
    }
}

/// Internal event type for the simulated RF field.
#[derive(Debug, Clone, Copy)]
enum FieldEvent {
    Entered(Uid),
    Left,
    Fault(ReaderFault),
}

/// Handle for controlling a [`MockReader`].
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    /// Channel sender for field events
    event_tx: mpsc::Sender<FieldEvent>,

    /// Device name
    name: String,

    version: Arc<AtomicU8>,
}

impl MockReaderHandle {
    /// Place a tag on the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present(&self, uid: Uid) -> Result<()> {
        self.send(FieldEvent::Entered(uid)).await
    }

    /// Take the current tag off the reader.
    pub async fn remove(&self) -> Result<()> {
        self.send(FieldEvent::Left).await
    }

    /// Present a tag and take it away again.
    ///
    /// The reader still reports the tag once, even if it polls only after
    /// the tag has left.
    pub async fn tap(&self, uid: Uid) -> Result<()> {
        self.present(uid).await?;
        self.remove().await
    }

    /// Make the next read fail with `fault`.
    ///
    /// Field events sent before the fault are still delivered on later
    /// reads.
    pub async fn inject_fault(&self, fault: ReaderFault) -> Result<()> {
        self.send(FieldEvent::Fault(fault)).await
    }

    /// Simulate a broken bus: every later call on the reader fails.
    pub fn disconnect(&self) {
        self.set_version_register(0x00);
    }

    /// Overwrite the simulated version register.
    pub fn set_version_register(&self, version: u8) {
        self.version.store(version, Ordering::Relaxed);
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, event: FieldEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| HardwareError::disconnected(self.name.clone()))
    }
}
