//! Integration tests for the file-backed storage image.
//!
//! Run with: cargo test --package latchkey-storage --test file_storage

use latchkey_core::Uid;
use latchkey_storage::backend::{DurableStorage, FileStorage, ReadStorage};
use latchkey_storage::{AdminRegistry, CredentialStore, StorageError, StoreLayout};
use tempfile::TempDir;

#[test]
fn test_new_image_is_erased() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eeprom.bin");

    let storage = FileStorage::open(&path, 64).unwrap();

    assert_eq!(storage.size(), 64);
    assert_eq!(storage.read(0).unwrap(), 0xFF);
    assert_eq!(std::fs::read(&path).unwrap(), vec![0xFF; 64]);
}

#[test]
fn test_creates_parent_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("eeprom.bin");

    FileStorage::open(&path, 16).unwrap();

    assert!(path.exists());
}

#[test]
fn test_writes_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eeprom.bin");
    let admin: Uid = "AA:BB:CC:DD".parse().unwrap();
    let tag: Uid = "11:22:33:44".parse().unwrap();

    {
        let mut storage = FileStorage::open(&path, 64).unwrap();
        let layout = StoreLayout::for_storage(&storage, 4).unwrap();
        CredentialStore::new(&mut storage, layout).format().unwrap();
        AdminRegistry::new(&mut storage, layout)
            .define(&admin)
            .unwrap();
        CredentialStore::new(&mut storage, layout).add(&tag).unwrap();
        storage.sync().unwrap();
    }

    let storage = FileStorage::open(&path, 64).unwrap();
    let layout = StoreLayout::for_storage(&storage, 4).unwrap();
    assert!(AdminRegistry::new(&storage, layout).is_admin(&admin).unwrap());

    let store = CredentialStore::new(&storage, layout);
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.uids().unwrap(), vec![tag]);
}

#[test]
fn test_size_mismatch_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("eeprom.bin");
    std::fs::write(&path, vec![0u8; 32]).unwrap();

    let result = FileStorage::open(&path, 64);

    assert!(matches!(
        result,
        Err(StorageError::SizeMismatch {
            expected: 64,
            actual: 32
        })
    ));
}

#[test]
fn test_out_of_range_write() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::open(dir.path().join("eeprom.bin"), 8).unwrap();

    assert!(matches!(
        storage.write(8, 1),
        Err(StorageError::AddressOutOfRange { address: 8, size: 8 })
    ));
    assert!(storage.update(7, 1).unwrap());
    assert!(!storage.update(7, 1).unwrap());
}
