//! Postgres-backed ledger store.
//!
//! Append-only semantics are enforced at the database level: there is no
//! UPDATE or DELETE path for `ledger_blocks`, the primary key on
//! `certificate_id` is the issue-once backstop, and block numbers come from
//! a single-row head counter incremented inside the insert transaction —
//! the row lock taken by the `UPDATE … RETURNING` makes the assignment
//! indivisible under concurrent appends (never read-max-then-insert).
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE ledger_blocks (
//!     certificate_id TEXT PRIMARY KEY,
//!     hash           TEXT NOT NULL,
//!     block_number   BIGINT NOT NULL UNIQUE CHECK (block_number > 0),
//!     timestamp      TIMESTAMPTZ NOT NULL,
//!     verified       BOOLEAN NOT NULL
//! );
//! CREATE INDEX ledger_blocks_hash_idx ON ledger_blocks (hash);
//!
//! CREATE TABLE ledger_head (
//!     singleton    BOOLEAN PRIMARY KEY DEFAULT TRUE CHECK (singleton),
//!     block_number BIGINT NOT NULL
//! );
//! INSERT INTO ledger_head (singleton, block_number) VALUES (TRUE, 0);
//! ```
//!
//! ## Error mapping
//!
//! | SQLx error | PostgreSQL code | LedgerError | Scenario |
//! |------------|-----------------|-------------|----------|
//! | Database (unique violation) | `23505` | `DuplicateCertificate` | Second append for one certificate id |
//! | Database (other) | any other | `Storage` | Constraint/connection failures |
//! | PoolClosed / network / other | n/a | `Storage` | Persistence layer unreachable |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::instrument;

use certledger_core::{CertificateId, Fingerprint};
use certledger_ledger::{BlockRecord, LedgerError, LedgerStats, LedgerStore};

/// Postgres-backed append-only ledger store.
///
/// `Send + Sync`; the SQLx pool handles connection management across tasks.
#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: Arc<PgPool>,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[instrument(skip(self, hash), fields(certificate_id = %certificate_id), err)]
    async fn append_block(
        &self,
        certificate_id: &CertificateId,
        hash: &Fingerprint,
    ) -> Result<BlockRecord, LedgerError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // Atomic sequence assignment: the head row lock serializes
        // concurrent appends for the duration of the transaction.
        let head = sqlx::query(
            "UPDATE ledger_head SET block_number = block_number + 1 RETURNING block_number",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("advance_head", e))?;

        let block_number: i64 = head
            .try_get("block_number")
            .map_err(|e| LedgerError::Storage(format!("failed to read head counter: {e}")))?;

        let timestamp = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO ledger_blocks (certificate_id, hash, block_number, timestamp, verified)
            VALUES ($1, $2, $3, $4, TRUE)
            "#,
        )
        .bind(certificate_id.as_str())
        .bind(hash.as_str())
        .bind(block_number)
        .bind(timestamp)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::DuplicateCertificate(certificate_id.clone())
            } else {
                map_sqlx_error("insert_block", e)
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(BlockRecord {
            certificate_id: certificate_id.clone(),
            hash: hash.clone(),
            block_number: block_number as u64,
            timestamp,
            verified: true,
        })
    }

    #[instrument(skip(self), fields(certificate_id = %certificate_id), err)]
    async fn find_by_certificate_id(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<Option<BlockRecord>, LedgerError> {
        let row = sqlx::query(
            r#"
            SELECT certificate_id, hash, block_number, timestamp, verified
            FROM ledger_blocks
            WHERE certificate_id = $1
            "#,
        )
        .bind(certificate_id.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_certificate_id", e))?;

        row.map(record_from_row).transpose()
    }

    #[instrument(skip_all, err)]
    async fn find_by_hash(&self, hash: &Fingerprint) -> Result<Option<BlockRecord>, LedgerError> {
        let row = sqlx::query(
            r#"
            SELECT certificate_id, hash, block_number, timestamp, verified
            FROM ledger_blocks
            WHERE hash = $1
            LIMIT 1
            "#,
        )
        .bind(hash.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_hash", e))?;

        row.map(record_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<BlockRecord>, LedgerError> {
        let rows = sqlx::query(
            r#"
            SELECT certificate_id, hash, block_number, timestamp, verified
            FROM ledger_blocks
            ORDER BY block_number ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.into_iter().map(record_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn stats(&self) -> Result<LedgerStats, LedgerError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM ledger_blocks) AS count,
                b.block_number AS max_block_number,
                b.timestamp AS last_timestamp
            FROM ledger_blocks b
            ORDER BY b.block_number DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("stats", e))?;

        let Some(row) = row else {
            return Ok(LedgerStats {
                count: 0,
                max_block_number: 0,
                last_timestamp: None,
            });
        };

        let count: i64 = row
            .try_get("count")
            .map_err(|e| LedgerError::Storage(format!("failed to read count: {e}")))?;
        let max_block_number: i64 = row
            .try_get("max_block_number")
            .map_err(|e| LedgerError::Storage(format!("failed to read max_block_number: {e}")))?;
        let last_timestamp: DateTime<Utc> = row
            .try_get("last_timestamp")
            .map_err(|e| LedgerError::Storage(format!("failed to read last_timestamp: {e}")))?;

        Ok(LedgerStats {
            count: count as u64,
            max_block_number: max_block_number as u64,
            last_timestamp: Some(last_timestamp),
        })
    }
}

/// Decode one row, validating the persisted values at the boundary.
fn record_from_row(row: sqlx::postgres::PgRow) -> Result<BlockRecord, LedgerError> {
    let certificate_id: String = row
        .try_get("certificate_id")
        .map_err(|e| LedgerError::Storage(format!("failed to read certificate_id: {e}")))?;
    let hash: String = row
        .try_get("hash")
        .map_err(|e| LedgerError::Storage(format!("failed to read hash: {e}")))?;
    let block_number: i64 = row
        .try_get("block_number")
        .map_err(|e| LedgerError::Storage(format!("failed to read block_number: {e}")))?;
    let timestamp: DateTime<Utc> = row
        .try_get("timestamp")
        .map_err(|e| LedgerError::Storage(format!("failed to read timestamp: {e}")))?;
    let verified: bool = row
        .try_get("verified")
        .map_err(|e| LedgerError::Storage(format!("failed to read verified: {e}")))?;

    Ok(BlockRecord {
        certificate_id: CertificateId::new(certificate_id)
            .map_err(|e| LedgerError::Storage(format!("corrupt certificate_id: {e}")))?,
        hash: Fingerprint::parse(hash)
            .map_err(|e| LedgerError::Storage(format!("corrupt hash: {e}")))?,
        block_number: block_number as u64,
        timestamp,
        verified,
    })
}

/// Map SQLx errors to LedgerError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> LedgerError {
    match err {
        sqlx::Error::Database(db_err) => LedgerError::Storage(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            LedgerError::Storage(format!("connection pool closed in {operation}"))
        }
        _ => LedgerError::Storage(format!("sqlx error in {operation}: {err}")),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
