//! Address arithmetic for the credential store.

use crate::backend::ReadStorage;
use crate::error::{StorageError, StorageResult};
use latchkey_core::constants::{
    ADMIN_UID_ADDRESS, DEFAULT_STORAGE_SIZE, DEFAULT_UID_LENGTH, MAX_RECORDS, MAX_UID_LENGTH,
    MIN_UID_LENGTH,
};
use std::ops::Range;

/// Placement of the count, admin marker, admin UID and records on a
/// storage device of a given size.
///
/// Records are fixed width (the UID length of the deployed reader), so the
/// address of slot `n` is computed rather than stored.
///
/// # Examples
///
/// ```
/// use latchkey_storage::StoreLayout;
///
/// let layout = StoreLayout::default();
/// assert_eq!(layout.admin_uid_range(), 2..6);
/// assert_eq!(layout.slot_address(1), 6);
/// assert_eq!(layout.slot_address(2), 10);
/// assert_eq!(layout.capacity(), 254);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLayout {
    uid_length: usize,
    storage_size: usize,
}

impl StoreLayout {
    /// Create a layout for `uid_length`-byte records on `storage_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Layout` if the UID length is outside 4-10 bytes
    /// or the device cannot hold the header and at least one record.
    pub fn new(uid_length: usize, storage_size: usize) -> StorageResult<Self> {
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&uid_length) {
            return Err(StorageError::Layout(format!(
                "UID length must be {MIN_UID_LENGTH}-{MAX_UID_LENGTH} bytes, got {uid_length}"
            )));
        }

        let layout = Self {
            uid_length,
            storage_size,
        };
        let minimum = layout.records_base() + uid_length;
        if storage_size < minimum {
            return Err(StorageError::Layout(format!(
                "Storage of {storage_size} bytes cannot hold a single {uid_length}-byte record (need {minimum})"
            )));
        }

        Ok(layout)
    }

    /// Create a layout sized to an existing device.
    pub fn for_storage<S: ReadStorage>(storage: &S, uid_length: usize) -> StorageResult<Self> {
        Self::new(uid_length, storage.size())
    }

    /// Record width in bytes.
    pub fn uid_length(&self) -> usize {
        self.uid_length
    }

    /// Device size the layout was computed for.
    pub fn storage_size(&self) -> usize {
        self.storage_size
    }

    /// Addresses of the admin UID.
    pub fn admin_uid_range(&self) -> Range<usize> {
        ADMIN_UID_ADDRESS..ADMIN_UID_ADDRESS + self.uid_length
    }

    /// Address of the first record (slot 1).
    pub fn records_base(&self) -> usize {
        ADMIN_UID_ADDRESS + self.uid_length
    }

    /// Number of record slots, bounded by the device and the one-byte count.
    pub fn capacity(&self) -> usize {
        ((self.storage_size - self.records_base()) / self.uid_length).min(MAX_RECORDS)
    }

    /// Address of 1-based `slot`.
    pub fn slot_address(&self, slot: usize) -> usize {
        debug_assert!(slot >= 1, "slots are 1-based");
        self.records_base() + (slot - 1) * self.uid_length
    }

    /// Addresses covered by every record slot.
    pub fn records_range(&self) -> Range<usize> {
        self.records_base()..self.records_base() + self.capacity() * self.uid_length
    }

    /// Check that the layout fits on `storage`.
    pub fn check_fits<S: ReadStorage>(&self, storage: &S) -> StorageResult<()> {
        if storage.size() < self.storage_size {
            return Err(StorageError::Layout(format!(
                "Layout needs {} bytes, storage has {}",
                self.storage_size,
                storage.size()
            )));
        }
        Ok(())
    }
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            uid_length: DEFAULT_UID_LENGTH,
            storage_size: DEFAULT_STORAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStorage;
    use rstest::rstest;

    #[test]
    fn test_default_matches_reference_layout() {
        let layout = StoreLayout::default();
        assert_eq!(layout.uid_length(), 4);
        assert_eq!(layout.records_base(), 6);
        assert_eq!(layout.slot_address(3), 14);
    }

    #[rstest]
    #[case(4, 1024, 254)]
    #[case(4, 22, 4)]
    #[case(4, 10, 1)]
    #[case(7, 1024, 145)]
    #[case(4, 4096, 255)] // clamped by the one-byte count
    fn test_capacity(#[case] uid_length: usize, #[case] size: usize, #[case] expected: usize) {
        let layout = StoreLayout::new(uid_length, size).unwrap();
        assert_eq!(layout.capacity(), expected);
    }

    #[rstest]
    #[case(3, 1024)] // UID too short
    #[case(11, 1024)] // UID too long
    #[case(4, 9)] // no room for a record
    fn test_invalid_layout(#[case] uid_length: usize, #[case] size: usize) {
        assert!(matches!(
            StoreLayout::new(uid_length, size),
            Err(StorageError::Layout(_))
        ));
    }

    #[test]
    fn test_records_range() {
        let layout = StoreLayout::new(4, 22).unwrap();
        assert_eq!(layout.records_range(), 6..22);
    }

    #[test]
    fn test_check_fits() {
        let layout = StoreLayout::new(4, 64).unwrap();
        assert!(layout.check_fits(&MemoryStorage::new(64)).is_ok());
        assert!(layout.check_fits(&MemoryStorage::new(32)).is_err());
        assert_eq!(
            StoreLayout::for_storage(&MemoryStorage::new(32), 4)
                .unwrap()
                .capacity(),
            6
        );
    }
}
