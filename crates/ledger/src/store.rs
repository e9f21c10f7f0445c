//! Append-only ledger store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use certledger_core::{CertificateId, Fingerprint};

use crate::block::BlockRecord;

/// Ledger store operation error.
///
/// Infrastructure errors only. "No record for this id/hash" is a negative
/// lookup (`Ok(None)`), never an error: callers turn it into a negative
/// verification result.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The uniqueness backstop fired: a record already exists for this
    /// certificate id. Issuing twice is a caller-contract violation.
    #[error("certificate already recorded on the ledger: {0}")]
    DuplicateCertificate(CertificateId),

    /// Persistence layer unreachable or misbehaving. Propagated to the
    /// caller untransformed; never retried inside this subsystem.
    #[error("storage unavailable: {0}")]
    Storage(String),
}

/// Rollup counters over the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Total number of records.
    pub count: u64,
    /// Highest block number, 0 when the ledger is empty.
    pub max_block_number: u64,
    /// Timestamp of the record holding `max_block_number`, absent when empty.
    pub last_timestamp: Option<DateTime<Utc>>,
}

/// Append-only record store with sequence assignment and lookup.
///
/// ## Append semantics
///
/// `append_block` assigns the next block number as max + 1 (1 when empty),
/// stamps the current instant and sets `verified = true`. Assignment must be
/// indivisible under concurrent appends: implementations use a single write
/// lock or an atomically incremented head counter inside the insert
/// transaction, never a separate read-max-then-insert pair.
///
/// ## Immutability
///
/// There is no update or delete operation. Records are write-once; readers
/// never observe partial records.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append a new record for a certificate.
    async fn append_block(
        &self,
        certificate_id: &CertificateId,
        hash: &Fingerprint,
    ) -> Result<BlockRecord, LedgerError>;

    /// Look up the record for a certificate id.
    async fn find_by_certificate_id(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<Option<BlockRecord>, LedgerError>;

    /// Exact-equality lookup on the hash field.
    async fn find_by_hash(&self, hash: &Fingerprint) -> Result<Option<BlockRecord>, LedgerError>;

    /// All records in block-number order (explorer/admin view).
    async fn list(&self) -> Result<Vec<BlockRecord>, LedgerError>;

    /// Rollup counters.
    async fn stats(&self) -> Result<LedgerStats, LedgerError>;
}

#[async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn append_block(
        &self,
        certificate_id: &CertificateId,
        hash: &Fingerprint,
    ) -> Result<BlockRecord, LedgerError> {
        (**self).append_block(certificate_id, hash).await
    }

    async fn find_by_certificate_id(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<Option<BlockRecord>, LedgerError> {
        (**self).find_by_certificate_id(certificate_id).await
    }

    async fn find_by_hash(&self, hash: &Fingerprint) -> Result<Option<BlockRecord>, LedgerError> {
        (**self).find_by_hash(hash).await
    }

    async fn list(&self) -> Result<Vec<BlockRecord>, LedgerError> {
        (**self).list().await
    }

    async fn stats(&self) -> Result<LedgerStats, LedgerError> {
        (**self).stats().await
    }
}
