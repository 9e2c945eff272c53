//! Core constants for the Latchkey door controller.
//!
//! This module defines the durable storage layout, identifier bounds, and the
//! default timings used throughout the controller. Keeping them in one place
//! guarantees that a storage image written by one build is read back the same
//! way by the next.
//!
//! # Storage Layout
//!
//! The credential store lives in a small byte-addressable durable memory
//! (EEPROM or an image file that emulates one):
//!
//! ```text
//! +-------+--------+-----------------+-----------+-----------+-----
//! | count | marker | admin uid (W)   | record 1  | record 2  | ...
//! +-------+--------+-----------------+-----------+-----------+-----
//!    0       1       2 .. 2+W          2+W ..      2+2W ..
//! ```
//!
//! `W` is the record width, which equals the UID length of the deployed
//! reader (4 bytes for the classic MIFARE profile).
//!
//! # Usage
//!
//! ```
//! use latchkey_core::constants::*;
//!
//! assert_eq!(COUNT_ADDRESS, 0);
//! assert_eq!(ADMIN_MARKER_ADDRESS, 1);
//! assert_eq!(ADMIN_UID_ADDRESS, 2);
//! assert_eq!(ADMIN_UID_ADDRESS + DEFAULT_UID_LENGTH, 6);
//! ```

// ============================================================================
// Storage Layout
// ============================================================================

/// Address of the credential count byte (conceptually slot 0).
pub const COUNT_ADDRESS: usize = 0;

/// Address of the admin-defined marker byte.
pub const ADMIN_MARKER_ADDRESS: usize = 1;

/// First address of the admin identifier.
pub const ADMIN_UID_ADDRESS: usize = 2;

/// Marker value that flags the admin identifier as defined.
///
/// Any other value (including the `0xFF` of an erased EEPROM and the `0x00`
/// left by a wipe) means the admin is undefined.
pub const ADMIN_DEFINED_MARKER: u8 = 143;

/// Upper bound on stored credentials imposed by the one-byte count.
pub const MAX_RECORDS: usize = u8::MAX as usize;

/// Default durable storage size in bytes (ATmega328 EEPROM).
pub const DEFAULT_STORAGE_SIZE: usize = 1024;

/// Byte value of an erased (never programmed) EEPROM cell.
pub const ERASED_BYTE: u8 = 0xFF;

// ============================================================================
// Identifiers
// ============================================================================

/// Minimum UID length in bytes (per ISO 14443 specification).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum UID length in bytes (per ISO 14443 specification).
pub const MAX_UID_LENGTH: usize = 10;

/// UID length of the observed hardware profile (single-size MIFARE UID).
pub const DEFAULT_UID_LENGTH: usize = 4;

// ============================================================================
// Timing (milliseconds)
// ============================================================================

/// How long the strike stays unlocked after a granted scan.
pub const DEFAULT_UNLOCK_MS: u64 = 2000;

/// How long the wipe button must be held before the store is erased.
pub const DEFAULT_WIPE_HOLD_MS: u64 = 3000;

/// Delay between two iterations of the control loop.
///
/// Must stay well under [`DEFAULT_WIPE_HOLD_MS`] so that a held button is
/// sampled several times before the threshold elapses.
pub const DEFAULT_POLL_MS: u64 = 50;
