//! Durable credential storage for the Latchkey door controller.
//!
//! This crate keeps the allow-list of tag UIDs and the admin tag on a small
//! byte-addressable durable medium (an EEPROM, or an image file emulating
//! one on a host).
//!
//! # Architecture
//!
//! - [`backend`] - [`ReadStorage`]/[`DurableStorage`] traits plus the
//!   [`MemoryStorage`] and [`FileStorage`] backends
//! - [`StoreLayout`] - where the count, admin marker, admin UID and records live
//! - [`CredentialStore`] - add / remove / lookup / count over densely packed records
//! - [`AdminRegistry`] - first-boot admin enrollment and admin lookups
//!
//! Store and registry are thin views over a storage handle. Pass `&storage`
//! for lookups and `&mut storage` for mutations, so both can be used on the
//! same device one after the other without copying it.
//!
//! # Examples
//!
//! ```
//! use latchkey_core::Uid;
//! use latchkey_storage::{AdminRegistry, CredentialStore, StoreLayout};
//! use latchkey_storage::backend::MemoryStorage;
//!
//! # fn example() -> latchkey_storage::StorageResult<()> {
//! let mut storage = MemoryStorage::erased(1024);
//! let layout = StoreLayout::for_storage(&storage, 4)?;
//!
//! // A factory-fresh device must be formatted before use
//! CredentialStore::new(&mut storage, layout).format()?;
//!
//! let admin: Uid = "AA:BB:CC:DD".parse()?;
//! AdminRegistry::new(&mut storage, layout).define(&admin)?;
//!
//! let tag: Uid = "11:22:33:44".parse()?;
//! CredentialStore::new(&mut storage, layout).add(&tag)?;
//!
//! assert!(AdminRegistry::new(&storage, layout).is_admin(&admin)?);
//! assert!(CredentialStore::new(&storage, layout).contains(&tag)?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod admin;
pub mod backend;
pub mod credentials;
pub mod error;
pub mod layout;

pub use admin::AdminRegistry;
pub use backend::{DurableStorage, FileStorage, MemoryStorage, ReadStorage};
pub use credentials::CredentialStore;
pub use error::{StorageError, StorageResult};
pub use layout::StoreLayout;
