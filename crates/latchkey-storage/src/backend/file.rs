//! File-backed storage image.
//!
//! Emulates an EEPROM on a host machine: the whole image is mirrored in
//! memory for reads, and every changed byte is written through to the file
//! at its offset so that a process restart sees exactly what a power cycle
//! would.

use super::{DurableStorage, ReadStorage, check_address};
use crate::error::{StorageError, StorageResult};
use latchkey_core::constants::ERASED_BYTE;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Durable storage persisted to a single image file.
#[derive(Debug)]
pub struct FileStorage {
    file: File,
    path: PathBuf,
    image: Vec<u8>,
}

impl FileStorage {
    /// Open the image at `path`, creating it if needed.
    ///
    /// A new image is `size` bytes of `0xFF`, the state of a never-programmed
    /// EEPROM.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::SizeMismatch` if an existing image is not
    /// exactly `size` bytes, or an I/O error if the file cannot be opened.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use latchkey_storage::backend::{FileStorage, ReadStorage};
    ///
    /// # fn example() -> latchkey_storage::StorageResult<()> {
    /// let storage = FileStorage::open("latchkey.eeprom", 1024)?;
    /// assert_eq!(storage.size(), 1024);
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>, size: usize) -> StorageResult<Self> {
        let path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let mut image = Vec::with_capacity(size);
        file.read_to_end(&mut image)?;

        if image.is_empty() {
            info!(
                "Creating storage image {} ({} bytes)",
                path.display(),
                size
            );
            image = vec![ERASED_BYTE; size];
            file.write_all(&image)?;
            file.sync_all()?;
        } else if image.len() != size {
            return Err(StorageError::SizeMismatch {
                expected: size,
                actual: image.len(),
            });
        } else {
            debug!("Opened storage image {}", path.display());
        }

        Ok(Self {
            file,
            path: path.to_path_buf(),
            image,
        })
    }

    /// Path of the image file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush pending writes to the physical device.
    pub fn sync(&self) -> StorageResult<()> {
        self.file.sync_data()?;
        Ok(())
    }
}

impl ReadStorage for FileStorage {
    fn size(&self) -> usize {
        self.image.len()
    }

    fn read(&self, address: usize) -> StorageResult<u8> {
        check_address(address, self.image.len())?;
        Ok(self.image[address])
    }
}

impl DurableStorage for FileStorage {
    fn write(&mut self, address: usize, value: u8) -> StorageResult<()> {
        check_address(address, self.image.len())?;
        self.file.seek(SeekFrom::Start(address as u64))?;
        self.file.write_all(&[value])?;
        self.image[address] = value;
        Ok(())
    }
}
