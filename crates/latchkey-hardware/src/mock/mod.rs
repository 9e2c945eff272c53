//! Mock device implementations for testing and development.
//!
//! Each mock comes as a `(device, handle)` pair: the device is moved into the
//! controller, the handle stays with the test (or the host binary) to drive
//! and observe it.

pub mod button;
pub mod door;
pub mod feedback;
pub mod reader;

// Re-export commonly used types
pub use button::{MockButton, MockButtonHandle};
pub use door::{DoorEvent, MockDoor, MockDoorHandle};
pub use feedback::{MockFeedback, MockFeedbackHandle};
pub use reader::{MockReader, MockReaderHandle, ReaderFault};
