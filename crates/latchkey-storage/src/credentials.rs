//! Credential store: the allow-list of tag UIDs.
//!
//! Records are kept densely packed from slot 1 to `count`, and the count
//! byte at address 0 is the single source of truth for which slots are
//! valid. Removing a record shifts every following record down one slot and
//! zeroes the vacated last slot, so the area past `count` always reads back
//! as zeros.
//!
//! All mutations go through [`DurableStorage::update`], so bytes that already
//! hold the target value are never rewritten.

use crate::backend::{DurableStorage, ReadStorage};
use crate::error::{StorageError, StorageResult};
use crate::layout::StoreLayout;
use latchkey_core::Uid;
use latchkey_core::constants::{COUNT_ADDRESS, MAX_UID_LENGTH};
use tracing::{debug, warn};

/// Fixed-capacity ordered list of tag UIDs on durable storage.
///
/// `S` is any storage handle: an owned device, `&S` for read-only lookups
/// or `&mut S` for mutations on a borrowed device.
///
/// # Examples
///
/// ```
/// use latchkey_core::Uid;
/// use latchkey_storage::{CredentialStore, StoreLayout};
/// use latchkey_storage::backend::MemoryStorage;
///
/// let mut store = CredentialStore::new(MemoryStorage::new(64), StoreLayout::new(4, 64).unwrap());
/// let uid: Uid = "11:22:33:44".parse().unwrap();
///
/// store.add(&uid).unwrap();
/// assert!(store.contains(&uid).unwrap());
/// assert_eq!(store.slot_of(&uid).unwrap(), Some(1));
///
/// store.remove(&uid).unwrap();
/// assert_eq!(store.count().unwrap(), 0);
/// ```
#[derive(Debug)]
pub struct CredentialStore<S> {
    storage: S,
    layout: StoreLayout,
}

impl<S: ReadStorage> CredentialStore<S> {
    /// Wrap `storage` using `layout`.
    ///
    /// The caller is responsible for the layout fitting the device (see
    /// [`StoreLayout::check_fits`]); [`CredentialStore::open`] does it for you.
    pub fn new(storage: S, layout: StoreLayout) -> Self {
        Self { storage, layout }
    }

    /// Wrap `storage` with a layout computed from its size.
    pub fn open(storage: S, uid_length: usize) -> StorageResult<Self> {
        let layout = StoreLayout::for_storage(&storage, uid_length)?;
        Ok(Self::new(storage, layout))
    }

    /// Storage layout in use.
    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Release the underlying storage.
    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Maximum number of records.
    pub fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    /// Number of valid records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupted` if the stored count exceeds the
    /// capacity (typically an erased, never-formatted device).
    pub fn count(&self) -> StorageResult<usize> {
        let count = self.storage.read(COUNT_ADDRESS)? as usize;
        if count > self.capacity() {
            return Err(StorageError::Corrupted(format!(
                "count {count} exceeds capacity {}",
                self.capacity()
            )));
        }
        Ok(count)
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.count()? == 0)
    }

    /// Returns `true` if every slot is in use.
    pub fn is_full(&self) -> StorageResult<bool> {
        Ok(self.count()? >= self.capacity())
    }

    /// Record at 1-based `slot`, or `None` if the slot is not in use.
    pub fn get(&self, slot: usize) -> StorageResult<Option<Uid>> {
        if slot == 0 || slot > self.count()? {
            return Ok(None);
        }
        self.read_slot(slot).map(Some)
    }

    /// All valid records in slot order.
    pub fn uids(&self) -> StorageResult<Vec<Uid>> {
        (1..=self.count()?).map(|slot| self.read_slot(slot)).collect()
    }

    /// 1-based slot holding `uid`, or `None` if it is not stored.
    ///
    /// Empty UIDs and UIDs of the wrong width are never found.
    pub fn slot_of(&self, uid: &Uid) -> StorageResult<Option<usize>> {
        if uid.is_empty() || uid.len() != self.layout.uid_length() {
            return Ok(None);
        }

        for slot in 1..=self.count()? {
            if self.read_slot(slot)?.matches(uid) {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }

    /// Returns `true` if `uid` is stored.
    pub fn contains(&self, uid: &Uid) -> StorageResult<bool> {
        Ok(self.slot_of(uid)?.is_some())
    }

    /// Verify the bookkeeping: the count is within capacity and every slot
    /// up to it holds a distinct non-empty record.
    pub fn check_integrity(&self) -> StorageResult<()> {
        let mut seen: Vec<Uid> = Vec::new();
        for slot in 1..=self.count()? {
            let uid = self.read_slot(slot)?;
            if uid.is_empty() {
                return Err(StorageError::Corrupted(format!(
                    "slot {slot} is empty but below the stored count"
                )));
            }
            if let Some(first) = seen.iter().position(|other| *other == uid) {
                return Err(StorageError::Corrupted(format!(
                    "slot {slot} repeats the record in slot {}",
                    first + 1
                )));
            }
            seen.push(uid);
        }
        Ok(())
    }

    fn read_slot(&self, slot: usize) -> StorageResult<Uid> {
        let width = self.layout.uid_length();
        let mut buf = [0u8; MAX_UID_LENGTH];
        self.storage
            .read_into(self.layout.slot_address(slot), &mut buf[..width])?;
        Ok(Uid::new(&buf[..width])?)
    }

    fn check_storable(&self, uid: &Uid) -> StorageResult<()> {
        if uid.len() != self.layout.uid_length() {
            return Err(StorageError::InvalidUidLength {
                expected: self.layout.uid_length(),
                actual: uid.len(),
            });
        }
        if uid.is_empty() {
            return Err(StorageError::EmptyUid);
        }
        Ok(())
    }
}

impl<S: DurableStorage> CredentialStore<S> {
    /// Append `uid` at slot `count + 1`.
    ///
    /// The record is written before the count, so an interrupted add never
    /// exposes a half-written slot. Returns the slot used.
    ///
    /// # Errors
    ///
    /// - `StorageError::AlreadyExists` if the UID is stored (no mutation)
    /// - `StorageError::StoreFull` if every slot is in use (no mutation)
    /// - `StorageError::EmptyUid` / `InvalidUidLength` for unstorable UIDs
    pub fn add(&mut self, uid: &Uid) -> StorageResult<usize> {
        self.check_storable(uid)?;

        if self.contains(uid)? {
            return Err(StorageError::AlreadyExists(*uid));
        }

        let count = self.count()?;
        if count >= self.capacity() {
            warn!("Credential store full, cannot add {}", uid);
            return Err(StorageError::StoreFull {
                capacity: self.capacity(),
            });
        }

        let slot = count + 1;
        self.storage
            .update_slice(self.layout.slot_address(slot), uid.as_bytes())?;
        self.storage.update(COUNT_ADDRESS, slot as u8)?;

        debug!("Stored {} in slot {}", uid, slot);
        Ok(slot)
    }

    /// Remove `uid`, shifting every following record down one slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the UID is not stored (no mutation).
    pub fn remove(&mut self, uid: &Uid) -> StorageResult<()> {
        let Some(found) = self.slot_of(uid)? else {
            return Err(StorageError::NotFound(*uid));
        };

        let count = self.count()?;
        let width = self.layout.uid_length();
        let mut buf = [0u8; MAX_UID_LENGTH];

        for slot in found..count {
            self.storage
                .read_into(self.layout.slot_address(slot + 1), &mut buf[..width])?;
            self.storage
                .update_slice(self.layout.slot_address(slot), &buf[..width])?;
        }

        self.storage
            .fill(self.layout.slot_address(count), width, 0)?;
        self.storage.update(COUNT_ADDRESS, (count - 1) as u8)?;

        debug!(
            "Removed {} from slot {}, shifted {} record(s)",
            uid,
            found,
            count - found
        );
        Ok(())
    }

    /// Reset the count and zero every record slot.
    ///
    /// The admin region is left untouched.
    pub fn format(&mut self) -> StorageResult<()> {
        let records = self.layout.records_range();
        self.storage.update(COUNT_ADDRESS, 0)?;
        let written = self.storage.fill(records.start, records.len(), 0)?;
        debug!("Formatted credential store ({} byte writes)", written);
        Ok(())
    }

    /// Zero every byte of the device.
    ///
    /// This clears all records, the count, the admin UID and the admin
    /// marker. The store is empty afterwards and no admin is defined.
    pub fn wipe_all(&mut self) -> StorageResult<()> {
        let size = self.storage.size();
        let written = self.storage.fill(0, size, 0)?;
        warn!("Wiped durable storage ({} bytes, {} writes)", size, written);
        Ok(())
    }
}
