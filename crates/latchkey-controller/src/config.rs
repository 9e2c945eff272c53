//! Controller configuration.
//!
//! Every field has a default, so an empty JSON object or an empty
//! environment yields a working controller.

use latchkey_core::constants::{
    DEFAULT_POLL_MS, DEFAULT_UID_LENGTH, DEFAULT_UNLOCK_MS, DEFAULT_WIPE_HOLD_MS, MAX_UID_LENGTH,
    MIN_UID_LENGTH,
};
use latchkey_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Environment variable overriding [`ControllerConfig::unlock_duration`] (milliseconds).
pub const ENV_UNLOCK_MS: &str = "LATCHKEY_UNLOCK_MS";
/// Environment variable overriding [`ControllerConfig::wipe_hold`] (milliseconds).
pub const ENV_WIPE_HOLD_MS: &str = "LATCHKEY_WIPE_HOLD_MS";
/// Environment variable overriding [`ControllerConfig::poll_interval`] (milliseconds).
pub const ENV_POLL_MS: &str = "LATCHKEY_POLL_MS";
/// Environment variable overriding [`ControllerConfig::uid_length`].
pub const ENV_UID_LENGTH: &str = "LATCHKEY_UID_LENGTH";

/// Timing and record-width settings for the controller.
///
/// Durations serialize as whole milliseconds.
///
/// # Examples
///
/// ```
/// use latchkey_controller::ControllerConfig;
/// use std::time::Duration;
///
/// let config = ControllerConfig::default()
///     .with_unlock_duration(Duration::from_secs(5))
///     .with_uid_length(7);
///
/// assert_eq!(config.unlock_duration, Duration::from_secs(5));
/// assert_eq!(config.wipe_hold, Duration::from_secs(3));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// How long the door stays unlocked after a grant.
    #[serde(with = "millis")]
    pub unlock_duration: Duration,

    /// How long the wipe button must be held.
    #[serde(with = "millis")]
    pub wipe_hold: Duration,

    /// Sleep between two polls of the button and reader.
    #[serde(with = "millis")]
    pub poll_interval: Duration,

    /// UID width of the deployed reader, in bytes.
    pub uid_length: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            unlock_duration: Duration::from_millis(DEFAULT_UNLOCK_MS),
            wipe_hold: Duration::from_millis(DEFAULT_WIPE_HOLD_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            uid_length: DEFAULT_UID_LENGTH,
        }
    }
}

impl ControllerConfig {
    pub fn with_unlock_duration(mut self, unlock_duration: Duration) -> Self {
        self.unlock_duration = unlock_duration;
        self
    }

    pub fn with_wipe_hold(mut self, wipe_hold: Duration) -> Self {
        self.wipe_hold = wipe_hold;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_uid_length(mut self, uid_length: usize) -> Self {
        self.uid_length = uid_length;
        self
    }

    /// Defaults overridden by the `LATCHKEY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a variable is not a number or the result
    /// fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_var(&lookup, ENV_UNLOCK_MS)? {
            config.unlock_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, ENV_WIPE_HOLD_MS)? {
            config.wipe_hold = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, ENV_POLL_MS)? {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(len) = parse_var(&lookup, ENV_UID_LENGTH)? {
            config.uid_length = len as usize;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the settings describe a usable controller.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&self.uid_length) {
            return Err(Error::Config(format!(
                "uid_length must be {}-{}, got {}",
                MIN_UID_LENGTH, MAX_UID_LENGTH, self.uid_length
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::Config("poll_interval must be non-zero".to_string()));
        }
        if self.wipe_hold.is_zero() {
            return Err(Error::Config("wipe_hold must be non-zero".to_string()));
        }
        Ok(())
    }
}

fn parse_var<F>(lookup: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::MissingConfig(key.to_string()));
    }
    raw.parse()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key} must be a whole number, got {raw:?}")))
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
