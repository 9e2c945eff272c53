use crate::{
    Result,
    constants::{MAX_UID_LENGTH, MIN_UID_LENGTH},
    error::Error,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use subtle::ConstantTimeEq;

/// Tag unique identifier (4-10 bytes, ISO 14443).
///
/// The bytes are stored inline so a `Uid` is `Copy` and never allocates.
///
/// # Empty identifiers
///
/// A UID made only of zero bytes is reserved as "unset": it is what a wiped
/// storage slot reads back as. [`Uid::matches`] never returns `true` when
/// either side is empty, so an uninitialized slot can never grant access.
///
/// # Security
/// Equality uses constant-time comparison so lookups do not leak how many
/// leading bytes of a scanned UID agree with a stored one.
#[derive(Clone, Copy, Eq)]
pub struct Uid {
    bytes: [u8; MAX_UID_LENGTH],
    len: u8,
}

impl Uid {
    /// Create a UID from raw bytes.
    ///
    /// # Errors
    /// Returns `Error::InvalidUid` if the length is not between 4 and 10 bytes.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let len = bytes.len();
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&len) {
            return Err(Error::InvalidUid(format!(
                "UID must be {MIN_UID_LENGTH}-{MAX_UID_LENGTH} bytes, got {len}"
            )));
        }

        let mut buf = [0u8; MAX_UID_LENGTH];
        buf[..len].copy_from_slice(bytes);
        Ok(Uid {
            bytes: buf,
            len: len as u8,
        })
    }

    /// Create the empty (all-zero) UID of the given length.
    ///
    /// # Errors
    /// Returns `Error::InvalidUid` if the length is out of range.
    pub fn empty(len: usize) -> Result<Self> {
        Self::new(&[0u8; MAX_UID_LENGTH + 1][..len.min(MAX_UID_LENGTH + 1)])
    }

    /// Get the UID bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Length of the UID in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` if every byte is zero (the reserved "unset" value).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().iter().all(|b| *b == 0)
    }

    /// Returns `true` if both UIDs are non-empty and byte-for-byte equal.
    ///
    /// This is the relation used for authorization. Unlike `==`, two empty
    /// UIDs never match.
    #[must_use]
    pub fn matches(&self, other: &Uid) -> bool {
        !self.is_empty() && !other.is_empty() && self == other
    }

    /// Format as contiguous upper-case hex (e.g. `04ABCDEF`).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{b:02X}")).collect()
    }
}

impl PartialEq for Uid {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && bool::from(self.as_bytes().ct_eq(other.as_bytes()))
    }
}

impl std::hash::Hash for Uid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, byte) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Uid({self})")
    }
}

/// Parse from hex text.
///
/// Accepts `AA:BB:CC:DD`, `aa-bb-cc-dd`, `AA BB CC DD` and `AABBCCDD`.
impl std::str::FromStr for Uid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits: Vec<u8> = s
            .trim()
            .bytes()
            .filter(|c| !matches!(c, b':' | b'-' | b' '))
            .collect();

        if digits.is_empty() || digits.len() % 2 != 0 {
            return Err(Error::InvalidUid(format!(
                "Expected an even number of hex digits: {s:?}"
            )));
        }

        let bytes = digits
            .chunks(2)
            .map(|pair| match (hex_value(pair[0]), hex_value(pair[1])) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(Error::InvalidUid(format!("Invalid hex in {s:?}"))),
            })
            .collect::<Result<Vec<u8>>>()?;

        Uid::new(&bytes)
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    (digit as char).to_digit(16).map(|v| v as u8)
}

impl TryFrom<&[u8]> for Uid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Uid::new(bytes)
    }
}

impl Serialize for Uid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("AA:BB:CC:DD", &[0xAA, 0xBB, 0xCC, 0xDD])]
    #[case("aa-bb-cc-dd", &[0xAA, 0xBB, 0xCC, 0xDD])]
    #[case("11 22 33 44", &[0x11, 0x22, 0x33, 0x44])]
    #[case("04ABCDEF", &[0x04, 0xAB, 0xCD, 0xEF])]
    #[case("01:02:03:04:05:06:07", &[1, 2, 3, 4, 5, 6, 7])]
    fn test_uid_parse_valid(#[case] input: &str, #[case] expected: &[u8]) {
        let uid: Uid = input.parse().unwrap();
        assert_eq!(uid.as_bytes(), expected);
    }

    #[rstest]
    #[case("")] // nothing
    #[case("AA:BB:CC")] // too short
    #[case("AABBCCD")] // odd digit count
    #[case("GG:BB:CC:DD")] // not hex
    #[case("00112233445566778899AA")] // too long
    fn test_uid_parse_invalid(#[case] input: &str) {
        let result: Result<Uid> = input.parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_uid_display() {
        let uid = Uid::new(&[0x04, 0xAB, 0xCD, 0xEF]).unwrap();
        assert_eq!(uid.to_string(), "04:AB:CD:EF");
        assert_eq!(uid.to_hex(), "04ABCDEF");
        assert_eq!(format!("{uid:?}"), "Uid(04:AB:CD:EF)");
    }

    #[test]
    fn test_uid_equality_requires_same_length() {
        let short = Uid::new(&[1, 2, 3, 4]).unwrap();
        let long = Uid::new(&[1, 2, 3, 4, 0, 0, 0]).unwrap();
        assert_ne!(short, long);
        assert!(!short.matches(&long));
    }

    #[test]
    fn test_empty_uid_never_matches() {
        let empty = Uid::empty(4).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty, Uid::empty(4).unwrap());
        assert!(!empty.matches(&Uid::empty(4).unwrap()));

        let real = Uid::new(&[0, 0, 0, 1]).unwrap();
        assert!(!real.is_empty());
        assert!(real.matches(&real));
        assert!(!real.matches(&empty));
    }

    #[test]
    fn test_empty_uid_length_bounds() {
        assert!(Uid::empty(3).is_err());
        assert!(Uid::empty(11).is_err());
        assert_eq!(Uid::empty(10).unwrap().len(), 10);
    }

    #[test]
    fn test_uid_serde_as_text() {
        let uid: Uid = "11:22:33:44".parse().unwrap();
        let json = serde_json::to_string(&uid).unwrap();
        assert_eq!(json, "\"11:22:33:44\"");

        let back: Uid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uid);
        assert!(serde_json::from_str::<Uid>("\"zz\"").is_err());
    }
}
