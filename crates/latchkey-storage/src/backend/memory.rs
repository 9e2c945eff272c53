//! RAM-backed storage image.

use super::{DurableStorage, ReadStorage, check_address};
use crate::error::StorageResult;
use latchkey_core::constants::ERASED_BYTE;

/// In-memory durable storage for tests and simulations.
///
/// Counts physical writes so callers can verify that unchanged bytes are
/// never rewritten.
///
/// # Examples
///
/// ```
/// use latchkey_storage::backend::{DurableStorage, MemoryStorage, ReadStorage};
///
/// let mut storage = MemoryStorage::new(16);
/// assert!(storage.update(3, 7).unwrap());
/// assert!(!storage.update(3, 7).unwrap());
/// assert_eq!(storage.read(3).unwrap(), 7);
/// assert_eq!(storage.write_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStorage {
    bytes: Vec<u8>,
    writes: usize,
}

impl MemoryStorage {
    /// Create a zero-filled image of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self::from_bytes(vec![0; size])
    }

    /// Create an image in the erased state (`0xFF`), like a factory EEPROM.
    pub fn erased(size: usize) -> Self {
        Self::from_bytes(vec![ERASED_BYTE; size])
    }

    /// Wrap an existing image.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, writes: 0 }
    }

    /// Get the raw image.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of physical writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl ReadStorage for MemoryStorage {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, address: usize) -> StorageResult<u8> {
        check_address(address, self.bytes.len())?;
        Ok(self.bytes[address])
    }

    fn read_into(&self, address: usize, buf: &mut [u8]) -> StorageResult<()> {
        if !buf.is_empty() {
            check_address(address + buf.len() - 1, self.bytes.len())?;
        }
        buf.copy_from_slice(&self.bytes[address..address + buf.len()]);
        Ok(())
    }
}

impl DurableStorage for MemoryStorage {
    fn write(&mut self, address: usize, value: u8) -> StorageResult<()> {
        check_address(address, self.bytes.len())?;
        self.bytes[address] = value;
        self.writes += 1;
        Ok(())
    }
}
