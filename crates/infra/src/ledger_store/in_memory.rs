use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use certledger_core::{CertificateId, Fingerprint};
use certledger_ledger::{BlockRecord, LedgerError, LedgerStats, LedgerStore};

/// In-memory append-only ledger store.
///
/// Intended for tests/dev. Block numbers are assigned under the single write
/// lock, so the max-plus-one computation and the insert are indivisible.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    // Append-only: records stay in append (= block number) order.
    blocks: RwLock<Vec<BlockRecord>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn append_block(
        &self,
        certificate_id: &CertificateId,
        hash: &Fingerprint,
    ) -> Result<BlockRecord, LedgerError> {
        let mut blocks = self
            .blocks
            .write()
            .map_err(|_| LedgerError::Storage("lock poisoned".to_string()))?;

        if blocks.iter().any(|b| b.certificate_id == *certificate_id) {
            return Err(LedgerError::DuplicateCertificate(certificate_id.clone()));
        }

        let block_number = blocks.last().map(|b| b.block_number).unwrap_or(0) + 1;
        let record = BlockRecord {
            certificate_id: certificate_id.clone(),
            hash: hash.clone(),
            block_number,
            timestamp: Utc::now(),
            verified: true,
        };
        blocks.push(record.clone());
        Ok(record)
    }

    async fn find_by_certificate_id(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<Option<BlockRecord>, LedgerError> {
        let blocks = self
            .blocks
            .read()
            .map_err(|_| LedgerError::Storage("lock poisoned".to_string()))?;
        Ok(blocks
            .iter()
            .find(|b| b.certificate_id == *certificate_id)
            .cloned())
    }

    async fn find_by_hash(&self, hash: &Fingerprint) -> Result<Option<BlockRecord>, LedgerError> {
        let blocks = self
            .blocks
            .read()
            .map_err(|_| LedgerError::Storage("lock poisoned".to_string()))?;
        Ok(blocks.iter().find(|b| b.hash == *hash).cloned())
    }

    async fn list(&self) -> Result<Vec<BlockRecord>, LedgerError> {
        let blocks = self
            .blocks
            .read()
            .map_err(|_| LedgerError::Storage("lock poisoned".to_string()))?;
        Ok(blocks.clone())
    }

    async fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let blocks = self
            .blocks
            .read()
            .map_err(|_| LedgerError::Storage("lock poisoned".to_string()))?;
        Ok(LedgerStats {
            count: blocks.len() as u64,
            max_block_number: blocks.last().map(|b| b.block_number).unwrap_or(0),
            last_timestamp: blocks.last().map(|b| b.timestamp),
        })
    }
}
