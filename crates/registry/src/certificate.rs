//! Denormalized certificate record and its repository seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use certledger_core::{CertificateId, CourseId, Fingerprint, StudentId};

use crate::RegistryError;

/// Certificate lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificateStatus {
    /// Created, not yet submitted to the ledger.
    Pending,
    /// Issued but not (re-)checked against the ledger.
    Issued,
    /// Issued and recorded on the ledger.
    Verified,
}

/// A course certificate as the calling layer stores it.
///
/// `ledger_hash` and `ledger_block_number` are denormalized copies of the
/// corresponding ledger record, written back at issuance time. The
/// denormalized hash is what verification compares against the ledger —
/// never a recomputation from the live student/course fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub certificate_id: CertificateId,
    /// Reference into the student directory; may dangle (resolved lazily).
    pub student_id: Option<StudentId>,
    /// Reference into the course catalog; may dangle (resolved lazily).
    pub course_id: Option<CourseId>,
    pub grade: String,
    pub score: Option<i32>,
    pub instructor_name: String,
    pub issue_date: DateTime<Utc>,
    pub ledger_hash: Option<Fingerprint>,
    pub ledger_block_number: Option<u64>,
    pub status: CertificateStatus,
    pub created_at: DateTime<Utc>,
}

impl Certificate {
    /// A fresh certificate with no ledger presence yet.
    pub fn new(
        certificate_id: CertificateId,
        student_id: Option<StudentId>,
        course_id: Option<CourseId>,
        grade: impl Into<String>,
        score: Option<i32>,
        instructor_name: impl Into<String>,
        issue_date: DateTime<Utc>,
    ) -> Self {
        Self {
            certificate_id,
            student_id,
            course_id,
            grade: grade.into(),
            score,
            instructor_name: instructor_name.into(),
            issue_date,
            ledger_hash: None,
            ledger_block_number: None,
            status: CertificateStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Whether this certificate already carries a ledger hash.
    pub fn is_issued(&self) -> bool {
        self.ledger_hash.is_some()
    }
}

/// Read/write access to certificate records, as the ledger needs it.
#[async_trait]
pub trait CertificateRepository: Send + Sync {
    /// Look up a certificate by its public id.
    async fn find(&self, id: &CertificateId) -> Result<Option<Certificate>, RegistryError>;

    /// Write the issuance result back onto the certificate: hash, block
    /// number, and status `Verified`.
    async fn record_issuance(
        &self,
        id: &CertificateId,
        hash: &Fingerprint,
        block_number: u64,
    ) -> Result<(), RegistryError>;
}

#[async_trait]
impl<R> CertificateRepository for Arc<R>
where
    R: CertificateRepository + ?Sized,
{
    async fn find(&self, id: &CertificateId) -> Result<Option<Certificate>, RegistryError> {
        (**self).find(id).await
    }

    async fn record_issuance(
        &self,
        id: &CertificateId,
        hash: &Fingerprint,
        block_number: u64,
    ) -> Result<(), RegistryError> {
        (**self).record_issuance(id, hash, block_number).await
    }
}
