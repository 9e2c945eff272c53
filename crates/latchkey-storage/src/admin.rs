//! Admin registry: the single tag that toggles program mode.
//!
//! The admin UID lives in its own reserved region, outside the credential
//! count and slots. Whether it is defined is recorded by a marker byte so an
//! erased (`0xFF`) or wiped (`0x00`) device reads as "no admin".

use crate::backend::{DurableStorage, ReadStorage};
use crate::error::{StorageError, StorageResult};
use crate::layout::StoreLayout;
use latchkey_core::Uid;
use latchkey_core::constants::{ADMIN_DEFINED_MARKER, ADMIN_MARKER_ADDRESS, MAX_UID_LENGTH};
use tracing::{info, warn};

/// Access to the admin tag stored on durable storage.
#[derive(Debug)]
pub struct AdminRegistry<S> {
    storage: S,
    layout: StoreLayout,
}

impl<S: ReadStorage> AdminRegistry<S> {
    /// Wrap `storage` using `layout`.
    pub fn new(storage: S, layout: StoreLayout) -> Self {
        Self { storage, layout }
    }

    /// Returns `true` if an admin tag has been enrolled.
    pub fn is_defined(&self) -> StorageResult<bool> {
        Ok(self.storage.read(ADMIN_MARKER_ADDRESS)? == ADMIN_DEFINED_MARKER)
    }

    /// The enrolled admin tag, or `None` if undefined.
    pub fn get(&self) -> StorageResult<Option<Uid>> {
        if !self.is_defined()? {
            return Ok(None);
        }

        let range = self.layout.admin_uid_range();
        let mut buf = [0u8; MAX_UID_LENGTH];
        self.storage
            .read_into(range.start, &mut buf[..range.len()])?;
        Ok(Some(Uid::new(&buf[..range.len()])?))
    }

    /// Returns `true` if `uid` is the admin tag.
    ///
    /// Always `false` for the empty UID and while no admin is defined.
    pub fn is_admin(&self, uid: &Uid) -> StorageResult<bool> {
        Ok(self.get()?.is_some_and(|admin| admin.matches(uid)))
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

impl<S: DurableStorage> AdminRegistry<S> {
    /// Enroll `uid` as the admin tag (first boot only).
    ///
    /// The UID is written before the marker, so an interrupted enrollment
    /// leaves the admin undefined rather than half-written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AdminAlreadyDefined` if an admin exists; use
    /// [`redefine`](AdminRegistry::redefine) to replace it explicitly.
    pub fn define(&mut self, uid: &Uid) -> StorageResult<()> {
        if self.is_defined()? {
            warn!("Refusing to overwrite the defined admin tag with {}", uid);
            return Err(StorageError::AdminAlreadyDefined);
        }
        self.store(uid)?;
        info!("Admin tag defined: {}", uid);
        Ok(())
    }

    /// Replace the admin tag, returning the previous one.
    ///
    /// This is the explicit re-enrollment path; the control loop never calls
    /// it on its own.
    pub fn redefine(&mut self, uid: &Uid) -> StorageResult<Option<Uid>> {
        self.check_storable(uid)?;
        let previous = self.get()?;
        self.storage.update(ADMIN_MARKER_ADDRESS, 0)?;
        self.store(uid)?;
        info!("Admin tag replaced: {:?} -> {}", previous, uid);
        Ok(previous)
    }

    /// Forget the admin tag: clear the marker and zero the UID.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.storage.update(ADMIN_MARKER_ADDRESS, 0)?;
        let range = self.layout.admin_uid_range();
        self.storage.fill(range.start, range.len(), 0)?;
        Ok(())
    }

    fn store(&mut self, uid: &Uid) -> StorageResult<()> {
        self.check_storable(uid)?;
        self.storage
            .update_slice(self.layout.admin_uid_range().start, uid.as_bytes())?;
        self.storage
            .update(ADMIN_MARKER_ADDRESS, ADMIN_DEFINED_MARKER)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStorage;

    fn uid(text: &str) -> Uid {
        text.parse().unwrap()
    }

    fn registry() -> AdminRegistry<MemoryStorage> {
        let storage = MemoryStorage::new(32);
        let layout = StoreLayout::for_storage(&storage, 4).unwrap();
        AdminRegistry::new(storage, layout)
    }

    #[test]
    fn test_undefined_at_factory_state() {
        for storage in [MemoryStorage::new(32), MemoryStorage::erased(32)] {
            let layout = StoreLayout::for_storage(&storage, 4).unwrap();
            let registry = AdminRegistry::new(storage, layout);
            assert!(!registry.is_defined().unwrap());
            assert_eq!(registry.get().unwrap(), None);
            assert!(!registry.is_admin(&uid("FF:FF:FF:FF")).unwrap());
        }
    }

    #[test]
    fn test_define_once() {
        let mut registry = registry();
        let admin = uid("AA:BB:CC:DD");

        registry.define(&admin).unwrap();

        assert!(registry.is_defined().unwrap());
        assert_eq!(registry.get().unwrap(), Some(admin));
        assert!(registry.is_admin(&admin).unwrap());
        assert!(!registry.is_admin(&uid("AA:BB:CC:DE")).unwrap());

        let bytes = registry.storage.as_bytes();
        assert_eq!(bytes[1], 143);
        assert_eq!(&bytes[2..6], &[0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(bytes[0], 0, "count untouched");
    }

    #[test]
    fn test_define_twice_is_rejected() {
        let mut registry = registry();
        registry.define(&uid("AA:BB:CC:DD")).unwrap();

        let result = registry.define(&uid("11:22:33:44"));
        assert!(matches!(result, Err(StorageError::AdminAlreadyDefined)));
        assert_eq!(registry.get().unwrap(), Some(uid("AA:BB:CC:DD")));
    }

    #[test]
    fn test_define_rejects_empty_uid() {
        let mut registry = registry();
        assert!(matches!(
            registry.define(&Uid::empty(4).unwrap()),
            Err(StorageError::EmptyUid)
        ));
        assert!(!registry.is_defined().unwrap());
    }

    #[test]
    fn test_is_admin_never_true_for_empty_uid() {
        // marker set but admin bytes zero: a corrupt image must not let an
        // all-zero scan through
        let mut image = vec![0u8; 32];
        image[1] = 143;
        let storage = MemoryStorage::from_bytes(image);
        let layout = StoreLayout::for_storage(&storage, 4).unwrap();
        let registry = AdminRegistry::new(storage, layout);

        assert!(registry.is_defined().unwrap());
        assert!(!registry.is_admin(&Uid::empty(4).unwrap()).unwrap());
    }

    #[test]
    fn test_redefine_replaces_admin() {
        let mut registry = registry();
        registry.define(&uid("AA:BB:CC:DD")).unwrap();

        let previous = registry.redefine(&uid("11:22:33:44")).unwrap();

        assert_eq!(previous, Some(uid("AA:BB:CC:DD")));
        assert!(registry.is_admin(&uid("11:22:33:44")).unwrap());
        assert!(!registry.is_admin(&uid("AA:BB:CC:DD")).unwrap());
    }

    #[test]
    fn test_redefine_rejects_bad_uid_without_clearing() {
        let mut registry = registry();
        registry.define(&uid("AA:BB:CC:DD")).unwrap();

        assert!(registry.redefine(&Uid::empty(4).unwrap()).is_err());
        assert!(registry.is_admin(&uid("AA:BB:CC:DD")).unwrap());
    }

    #[test]
    fn test_clear() {
        let mut registry = registry();
        registry.define(&uid("AA:BB:CC:DD")).unwrap();

        registry.clear().unwrap();

        assert!(!registry.is_defined().unwrap());
        assert!(registry.storage.as_bytes()[1..6].iter().all(|b| *b == 0));
    }
}
