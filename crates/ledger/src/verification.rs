//! Tamper-detection checks against the ledger.
//!
//! Verification never recomputes a fingerprint from live student/course
//! data. It only checks agreement between two stored copies of the same
//! hash: the certificate's denormalized copy and the ledger's record. An
//! attacker who rewrites both copies consistently is undetected by design;
//! the threat model assumes the ledger is the write-restricted copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use certledger_core::{CertificateId, Fingerprint};
use certledger_registry::{CertificateRepository, RegistryError};

use crate::block::BlockRecord;
use crate::store::{LedgerError, LedgerStore};

pub const MSG_NOT_FOUND: &str = "Certificate not found on blockchain";
pub const MSG_VERIFIED: &str = "Certificate verified successfully";
pub const MSG_TAMPERED: &str = "Certificate hash does not match - potential tampering detected";

/// Outcome of a verification check.
///
/// On a hash mismatch `block_number` and `timestamp` still come from the
/// ledger record: the record is the trust anchor, and the caller gets to see
/// which block the certificate claims to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_valid: bool,
    pub block_number: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub message: String,
}

impl VerificationResult {
    fn not_found() -> Self {
        Self {
            is_valid: false,
            block_number: None,
            timestamp: None,
            message: MSG_NOT_FOUND.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Checks a certificate's recorded fingerprint against the ledger.
#[derive(Debug, Clone)]
pub struct VerificationService<L, C> {
    ledger: L,
    certificates: C,
}

impl<L, C> VerificationService<L, C>
where
    L: LedgerStore,
    C: CertificateRepository,
{
    pub fn new(ledger: L, certificates: C) -> Self {
        Self {
            ledger,
            certificates,
        }
    }

    /// Verify by certificate id: compare the certificate's stored
    /// (denormalized) hash against the ledger record's hash.
    pub async fn verify_by_id(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<VerificationResult, VerificationError> {
        let Some(record) = self.ledger.find_by_certificate_id(certificate_id).await? else {
            return Ok(VerificationResult::not_found());
        };

        // The expected hash is the certificate's own copy. A certificate
        // that vanished (or lost its hash) after issuance has nothing to
        // compare, so it reads as not-found rather than tampered.
        let expected = self
            .certificates
            .find(certificate_id)
            .await?
            .and_then(|c| c.ledger_hash);
        let Some(expected) = expected else {
            return Ok(VerificationResult::not_found());
        };

        Ok(evaluate(&expected, &record))
    }

    /// Verify by hash: find the record by exact hash match, then evaluate
    /// the supplied hash against it.
    ///
    /// A lookup that succeeds is by construction already an exact match, so
    /// the tamper branch is unreachable through this entry point — an
    /// intentional asymmetry with `verify_by_id`, not a bug.
    pub async fn verify_by_hash(
        &self,
        hash: &Fingerprint,
    ) -> Result<VerificationResult, VerificationError> {
        let Some(record) = self.ledger.find_by_hash(hash).await? else {
            return Ok(VerificationResult::not_found());
        };

        Ok(evaluate(hash, &record))
    }
}

/// Exact string-equality check between two stored hash copies.
fn evaluate(expected: &Fingerprint, record: &BlockRecord) -> VerificationResult {
    if record.hash == *expected {
        VerificationResult {
            is_valid: true,
            block_number: Some(record.block_number),
            timestamp: Some(record.timestamp),
            message: MSG_VERIFIED.to_string(),
        }
    } else {
        VerificationResult {
            is_valid: false,
            block_number: Some(record.block_number),
            timestamp: Some(record.timestamp),
            message: MSG_TAMPERED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(hash: &Fingerprint, block_number: u64) -> BlockRecord {
        BlockRecord {
            certificate_id: CertificateId::new("CERT-1").unwrap(),
            hash: hash.clone(),
            block_number,
            timestamp: Utc::now(),
            verified: true,
        }
    }

    #[test]
    fn matching_copies_verify() {
        let hash = Fingerprint::parse("ab".repeat(32)).unwrap();
        let rec = record(&hash, 7);

        let result = evaluate(&hash, &rec);
        assert!(result.is_valid);
        assert_eq!(result.block_number, Some(7));
        assert_eq!(result.timestamp, Some(rec.timestamp));
        assert_eq!(result.message, MSG_VERIFIED);
    }

    #[test]
    fn mismatching_copies_flag_tampering_but_keep_the_record_position() {
        let ledger_hash = Fingerprint::parse("ab".repeat(32)).unwrap();
        let tampered = Fingerprint::parse("cd".repeat(32)).unwrap();
        let rec = record(&ledger_hash, 3);

        let result = evaluate(&tampered, &rec);
        assert!(!result.is_valid);
        assert_eq!(result.message, MSG_TAMPERED);
        // Position still reported from the original record.
        assert_eq!(result.block_number, Some(3));
        assert_eq!(result.timestamp, Some(rec.timestamp));
    }

    #[test]
    fn camel_case_wire_shape() {
        let result = VerificationResult::not_found();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], false);
        assert!(json["blockNumber"].is_null());
        assert_eq!(json["message"], MSG_NOT_FOUND);
    }
}
