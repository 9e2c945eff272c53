//! Byte-addressable durable storage backends.
//!
//! The credential store is written for a small EEPROM: single-byte reads and
//! writes at absolute addresses, with a bounded number of write cycles per
//! cell. These traits capture exactly that contract so the store can run on
//! a real EEPROM driver, a RAM image in tests, or an image file on a host.
//!
//! Reading and writing are split into [`ReadStorage`] and [`DurableStorage`]
//! so that read-only views (lookups, authorization) can borrow the device
//! shared while mutations need it exclusively.

use crate::error::{StorageError, StorageResult};

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Read access to a byte-addressable durable medium.
pub trait ReadStorage {
    /// Total size of the medium in bytes.
    fn size(&self) -> usize;

    /// Read the byte at `address`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AddressOutOfRange` if `address >= size()`, or
    /// an I/O error from the underlying device.
    fn read(&self, address: usize) -> StorageResult<u8>;

    /// Fill `buf` with the bytes starting at `address`.
    fn read_into(&self, address: usize, buf: &mut [u8]) -> StorageResult<()> {
        for (offset, byte) in buf.iter_mut().enumerate() {
            *byte = self.read(address + offset)?;
        }
        Ok(())
    }
}

/// Write access to a byte-addressable durable medium.
pub trait DurableStorage: ReadStorage {
    /// Unconditionally write `value` at `address`.
    ///
    /// Prefer [`update`](DurableStorage::update), which spares a write cycle
    /// when the cell already holds the value.
    fn write(&mut self, address: usize, value: u8) -> StorageResult<()>;

    /// Write `value` at `address` only if it differs from the stored byte.
    ///
    /// Returns `true` if a physical write happened.
    fn update(&mut self, address: usize, value: u8) -> StorageResult<bool> {
        if self.read(address)? == value {
            return Ok(false);
        }
        self.write(address, value)?;
        Ok(true)
    }

    /// [`update`](DurableStorage::update) every byte of `bytes` starting at
    /// `address`. Returns the number of physical writes.
    fn update_slice(&mut self, address: usize, bytes: &[u8]) -> StorageResult<usize> {
        let mut written = 0;
        for (offset, value) in bytes.iter().enumerate() {
            if self.update(address + offset, *value)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Set every byte in `address..address + len` to `value`, skipping cells
    /// that already hold it. Returns the number of physical writes.
    fn fill(&mut self, address: usize, len: usize, value: u8) -> StorageResult<usize> {
        let mut written = 0;
        for offset in 0..len {
            if self.update(address + offset, value)? {
                written += 1;
            }
        }
        Ok(written)
    }
}

impl<S: ReadStorage + ?Sized> ReadStorage for &S {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn read(&self, address: usize) -> StorageResult<u8> {
        (**self).read(address)
    }
}

impl<S: ReadStorage + ?Sized> ReadStorage for &mut S {
    fn size(&self) -> usize {
        (**self).size()
    }

    fn read(&self, address: usize) -> StorageResult<u8> {
        (**self).read(address)
    }
}

impl<S: DurableStorage + ?Sized> DurableStorage for &mut S {
    fn write(&mut self, address: usize, value: u8) -> StorageResult<()> {
        (**self).write(address, value)
    }
}

/// Bounds check shared by the in-process backends.
pub(crate) fn check_address(address: usize, size: usize) -> StorageResult<()> {
    if address >= size {
        return Err(StorageError::AddressOutOfRange { address, size });
    }
    Ok(())
}
