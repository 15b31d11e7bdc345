//! Record identifiers.
//!
//! Every stored record (application, news item, popup banner, contact
//! message) is keyed by a `RecordId`: 12 bytes rendered as 24 lowercase hex
//! characters, the same shape document databases use for object ids.
//!
//! # Layout
//!
//! - bytes 0..4: seconds since Unix epoch, big-endian
//! - bytes 4..9: random bytes chosen once per process
//! - bytes 9..12: per-process counter, big-endian
//!
//! # Invariants
//!
//! - Two ids generated by the same process never collide (until the 24-bit
//!   counter wraps within a single second).
//! - Within one process, ids sort in generation order.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of bytes in a record id.
pub const RECORD_ID_LEN: usize = 12;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

/// A unique identifier for a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub [u8; RECORD_ID_LEN]);

impl RecordId {
    /// Generate a fresh id stamped with the given time.
    #[allow(clippy::cast_possible_truncation)] // Seconds fit in u32 until 2106
    #[must_use]
    pub fn generate(now_secs: u64) -> Self {
        let process = PROCESS_UNIQUE.get_or_init(rand::random);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst) & 0x00FF_FFFF;

        let mut bytes = [0u8; RECORD_ID_LEN];
        bytes[..4].copy_from_slice(&(now_secs as u32).to_be_bytes());
        bytes[4..9].copy_from_slice(process);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// The id as a lowercase hex string, used as the storage key.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a well-formed record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRecordIdError(String);

impl fmt::Display for ParseRecordIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a record id (expected {} hex characters)",
            self.0,
            RECORD_ID_LEN * 2
        )
    }
}

impl std::error::Error for ParseRecordIdError {}

impl FromStr for RecordId {
    type Err = ParseRecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRecordIdError(s.to_string());

        if s.len() != RECORD_ID_LEN * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut bytes = [0u8; RECORD_ID_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
