//! Fingerprint value object.
//!
//! A fingerprint is the hex form of a 256-bit digest over a certificate's
//! display fields. This module only defines the value type and its
//! validation; digest computation lives with the ledger (which owns the
//! field ordering contract).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Hex length of a 256-bit digest.
pub const FINGERPRINT_LEN: usize = 64;

/// 64-character lowercase hex encoding of a 256-bit digest.
///
/// Validated at construction: comparisons elsewhere can rely on plain string
/// equality without re-normalizing case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parse and validate a fingerprint from its hex form.
    pub fn parse(s: impl Into<String>) -> Result<Self, DomainError> {
        let s = s.into();
        if s.len() != FINGERPRINT_LEN {
            return Err(DomainError::validation(format!(
                "fingerprint must be {FINGERPRINT_LEN} hex chars, got {}",
                s.len()
            )));
        }
        if !s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            return Err(DomainError::validation(
                "fingerprint must be lowercase hex".to_string(),
            ));
        }
        Ok(Self(s))
    }

    /// Construct from raw digest bytes (infallible: `hex::encode` is lowercase).
    pub fn from_digest(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_lowercase_hex_of_exact_length() {
        let s = "a".repeat(64);
        assert!(Fingerprint::parse(s).is_ok());
    }

    #[test]
    fn parse_rejects_uppercase_and_wrong_length() {
        assert!(Fingerprint::parse("A".repeat(64)).is_err());
        assert!(Fingerprint::parse("a".repeat(63)).is_err());
        assert!(Fingerprint::parse("g".repeat(64)).is_err());
    }

    #[test]
    fn from_digest_round_trips_through_parse() {
        let fp = Fingerprint::from_digest(&[0xab; 32]);
        assert_eq!(fp.as_str().len(), FINGERPRINT_LEN);
        assert_eq!(Fingerprint::parse(fp.as_str().to_string()).unwrap(), fp);
    }
}
