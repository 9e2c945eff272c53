//! Host-only settings: where the storage image lives.

use latchkey_core::constants::DEFAULT_STORAGE_SIZE;
use latchkey_core::{Error, Result};
use std::env;
use std::path::PathBuf;

pub const ENV_STORAGE: &str = "LATCHKEY_STORAGE";
pub const ENV_STORAGE_SIZE: &str = "LATCHKEY_STORAGE_SIZE";

const DEFAULT_STORAGE_PATH: &str = "latchkey.eeprom";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    pub storage_path: PathBuf,
    pub storage_size: usize,
}

impl HostSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_path = lookup(ENV_STORAGE)
            .filter(|path| !path.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);

        let storage_size = match lookup(ENV_STORAGE_SIZE) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_STORAGE_SIZE} must be a byte count, got {raw:?}"))
            })?,
            None => DEFAULT_STORAGE_SIZE,
        };

        Ok(Self {
            storage_path,
            storage_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = HostSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.storage_path, PathBuf::from("latchkey.eeprom"));
        assert_eq!(settings.storage_size, 1024);
    }

    #[test]
    fn test_overrides() {
        let settings = HostSettings::from_lookup(|key| match key {
            ENV_STORAGE => Some("/var/lib/latchkey/door.img".to_string()),
            ENV_STORAGE_SIZE => Some("4096".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(settings.storage_path, PathBuf::from("/var/lib/latchkey/door.img"));
        assert_eq!(settings.storage_size, 4096);
    }

    #[test]
    fn test_invalid_size() {
        let result = HostSettings::from_lookup(|key| {
            (key == ENV_STORAGE_SIZE).then(|| "1k".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
