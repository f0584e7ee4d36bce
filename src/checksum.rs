//! Schema fingerprints

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 checksum of a schema resource's raw bytes.
///
/// Two loads with the same checksum are treated as the same schema, which
/// lets the validator reuse a compiled schema across calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for log lines
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
