use latchkey_core::{RejectReason, Uid};
use thiserror::Error;

/// Storage-specific error types for the credential store.
///
/// The first group are the recoverable outcomes of credential and admin
/// operations (the store is left untouched). The second group are faults of
/// the durable medium or of its contents.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Identifier is already stored
    #[error("Tag {0} is already enrolled")]
    AlreadyExists(Uid),

    /// Every slot is in use
    #[error("Credential store full ({capacity} records)")]
    StoreFull { capacity: usize },

    /// Identifier is not stored
    #[error("Tag {0} is not enrolled")]
    NotFound(Uid),

    /// The all-zero identifier is reserved and cannot be stored
    #[error("Empty identifier cannot be stored")]
    EmptyUid,

    /// Identifier does not fit the fixed-width record
    #[error("Identifier length {actual} does not match record width {expected}")]
    InvalidUidLength { expected: usize, actual: usize },

    /// Admin tag already set, first-boot enrollment only
    #[error("Admin tag is already defined")]
    AdminAlreadyDefined,

    /// Address outside the durable medium
    #[error("Address {address} out of range for {size}-byte storage")]
    AddressOutOfRange { address: usize, size: usize },

    /// Stored bookkeeping contradicts the stored records
    #[error("Corrupted store: {0}")]
    Corrupted(String),

    /// Layout does not fit the storage device
    #[error("Layout error: {0}")]
    Layout(String),

    /// Existing storage image has an unexpected size
    #[error("Storage image size mismatch: expected {expected} bytes, found {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Identifier construction failed
    #[error(transparent)]
    Core(#[from] latchkey_core::Error),

    /// Backing file I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Map the error to the reason reported to the operator.
    pub fn reject_reason(&self) -> RejectReason {
        match self {
            StorageError::AlreadyExists(_) => RejectReason::AlreadyExists,
            StorageError::StoreFull { .. } => RejectReason::StoreFull,
            StorageError::NotFound(_) => RejectReason::NotFound,
            StorageError::EmptyUid | StorageError::InvalidUidLength { .. } => {
                RejectReason::InvalidUid
            }
            _ => RejectReason::StorageFault,
        }
    }

    /// Returns `true` if the error leaves the store unchanged and usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::AlreadyExists(_)
                | StorageError::StoreFull { .. }
                | StorageError::NotFound(_)
                | StorageError::EmptyUid
                | StorageError::InvalidUidLength { .. }
                | StorageError::AdminAlreadyDefined
        )
    }
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
