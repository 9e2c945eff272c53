//! Property-based tests for the credential store invariants.
//!
//! These tests use proptest to drive the store with random sets of tags and
//! random removal points, and check the invariants that every sequence of
//! operations must preserve.

use latchkey_core::Uid;
use latchkey_storage::backend::MemoryStorage;
use latchkey_storage::{CredentialStore, StorageError, StoreLayout};
use proptest::collection::hash_set;
use proptest::prelude::*;

const STORAGE_SIZE: usize = 6 + 4 * 32;

/// Strategy for generating non-empty 4-byte UIDs.
fn valid_uid() -> impl Strategy<Value = Uid> {
    any::<[u8; 4]>()
        .prop_filter("empty UID is reserved", |bytes| bytes != &[0; 4])
        .prop_map(|bytes| Uid::new(&bytes).unwrap())
}

/// Strategy for generating 1-32 distinct UIDs.
fn distinct_uids() -> impl Strategy<Value = Vec<Uid>> {
    hash_set(valid_uid(), 1..=32).prop_map(|set| set.into_iter().collect())
}

fn fresh_store() -> CredentialStore<MemoryStorage> {
    let storage = MemoryStorage::new(STORAGE_SIZE);
    let layout = StoreLayout::for_storage(&storage, 4).unwrap();
    CredentialStore::new(storage, layout)
}

/// Every byte from the first unused slot to the end of the device is zero.
fn tail_is_zeroed(store: &CredentialStore<MemoryStorage>) -> bool {
    let count = store.count().unwrap();
    let tail = store.layout().slot_address(count + 1);
    store.storage().as_bytes()[tail..].iter().all(|b| *b == 0)
}

proptest! {
    /// Property: the count always equals the number of distinct tags added.
    #[test]
    fn prop_count_tracks_adds(uids in distinct_uids()) {
        let mut store = fresh_store();
        for (i, uid) in uids.iter().enumerate() {
            prop_assert_eq!(store.add(uid).unwrap(), i + 1);
        }

        prop_assert_eq!(store.count().unwrap(), uids.len());
        for uid in &uids {
            prop_assert!(store.contains(uid).unwrap());
        }
        prop_assert_eq!(store.uids().unwrap(), uids);
        store.check_integrity().unwrap();
    }

    /// Property: adding a stored tag again changes nothing.
    #[test]
    fn prop_duplicate_add_is_noop(uids in distinct_uids(), pick in any::<prop::sample::Index>()) {
        let mut store = fresh_store();
        for uid in &uids {
            store.add(uid).unwrap();
        }
        let before = store.storage().as_bytes().to_vec();

        let duplicate = uids[pick.index(uids.len())];
        let result = store.add(&duplicate);

        prop_assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        prop_assert_eq!(store.storage().as_bytes(), before.as_slice());
    }

    /// Property: deleting slot k of n keeps the other n-1 tags in order,
    /// densely packed from slot 1, with nothing left past the count.
    #[test]
    fn prop_remove_preserves_order(uids in distinct_uids(), pick in any::<prop::sample::Index>()) {
        let mut store = fresh_store();
        for uid in &uids {
            store.add(uid).unwrap();
        }

        let k = pick.index(uids.len());
        store.remove(&uids[k]).unwrap();

        let mut expected = uids.clone();
        expected.remove(k);

        prop_assert_eq!(store.count().unwrap(), uids.len() - 1);
        prop_assert_eq!(store.uids().unwrap(), expected);
        prop_assert!(!store.contains(&uids[k]).unwrap());
        prop_assert!(tail_is_zeroed(&store));
        store.check_integrity().unwrap();
    }

    /// Property: add followed by remove restores the previous count and
    /// leaves no residue past it.
    #[test]
    fn prop_add_remove_restores_state(uids in distinct_uids(), extra in valid_uid()) {
        prop_assume!(!uids.contains(&extra));

        let mut store = fresh_store();
        for uid in uids.iter().take(31) {
            store.add(uid).unwrap();
        }
        let before = store.storage().as_bytes().to_vec();
        let count = store.count().unwrap();

        store.add(&extra).unwrap();
        store.remove(&extra).unwrap();

        prop_assert_eq!(store.count().unwrap(), count);
        prop_assert_eq!(store.storage().as_bytes(), before.as_slice());
        prop_assert!(tail_is_zeroed(&store));
    }

    /// Property: removing an absent tag changes nothing.
    #[test]
    fn prop_remove_absent_is_noop(uids in distinct_uids(), missing in valid_uid()) {
        prop_assume!(!uids.contains(&missing));

        let mut store = fresh_store();
        for uid in &uids {
            store.add(uid).unwrap();
        }
        let before = store.storage().as_bytes().to_vec();

        prop_assert!(matches!(store.remove(&missing), Err(StorageError::NotFound(_))));
        prop_assert_eq!(store.storage().as_bytes(), before.as_slice());
    }
}
