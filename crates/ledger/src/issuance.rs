//! First-time fingerprinting and ledger append for a certificate.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use certledger_core::{CertificateId, Fingerprint};
use certledger_registry::{
    Certificate, CertificateRepository, CourseCatalog, RegistryError, StudentDirectory,
};

use crate::fingerprint::CertificateFacts;
use crate::store::{LedgerError, LedgerStore};

/// What the caller gets back from a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceReceipt {
    pub hash: Fingerprint,
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum IssuanceError {
    /// The certificate record itself is unknown (distinct from a dangling
    /// student/course reference, which degrades silently).
    #[error("certificate not found: {0}")]
    CertificateNotFound(CertificateId),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Orchestrates fingerprinting and the ledger append.
///
/// Must only be invoked for a certificate with no existing ledger hash;
/// calling it twice is a caller-contract violation this service does not
/// guard against. The store's certificate-id uniqueness constraint is the
/// backstop (`LedgerError::DuplicateCertificate`).
#[derive(Debug, Clone)]
pub struct IssuanceService<L, C, S, K> {
    ledger: L,
    certificates: C,
    students: S,
    courses: K,
}

impl<L, C, S, K> IssuanceService<L, C, S, K>
where
    L: LedgerStore,
    C: CertificateRepository,
    S: StudentDirectory,
    K: CourseCatalog,
{
    pub fn new(ledger: L, certificates: C, students: S, courses: K) -> Self {
        Self {
            ledger,
            certificates,
            students,
            courses,
        }
    }

    /// Issue a certificate onto the ledger.
    pub async fn issue(
        &self,
        certificate_id: &CertificateId,
    ) -> Result<IssuanceReceipt, IssuanceError> {
        let certificate = self
            .certificates
            .find(certificate_id)
            .await?
            .ok_or_else(|| IssuanceError::CertificateNotFound(certificate_id.clone()))?;

        let facts = self.resolve_facts(&certificate).await?;
        let hash = facts.fingerprint();

        let record = self.ledger.append_block(certificate_id, &hash).await?;

        self.certificates
            .record_issuance(certificate_id, &record.hash, record.block_number)
            .await?;

        info!(
            certificate_id = %certificate_id,
            block_number = record.block_number,
            "certificate issued onto ledger"
        );

        Ok(IssuanceReceipt {
            hash: record.hash,
            block_number: record.block_number,
            timestamp: record.timestamp,
        })
    }

    /// Resolve the display fields the fingerprint is computed over.
    ///
    /// An unresolved student/course reference substitutes an empty string
    /// rather than failing the call — preserved behavior, candidate for
    /// hardening pending product clarification.
    async fn resolve_facts(
        &self,
        certificate: &Certificate,
    ) -> Result<CertificateFacts, RegistryError> {
        let student_name = match certificate.student_id {
            Some(id) => self.students.student_name(&id).await?,
            None => None,
        };
        if student_name.is_none() {
            warn!(
                certificate_id = %certificate.certificate_id,
                "student reference unresolved; fingerprinting with empty name"
            );
        }

        let course_name = match certificate.course_id {
            Some(id) => self.courses.course_name(&id).await?,
            None => None,
        };
        if course_name.is_none() {
            warn!(
                certificate_id = %certificate.certificate_id,
                "course reference unresolved; fingerprinting with empty name"
            );
        }

        Ok(CertificateFacts {
            student_name: student_name.unwrap_or_default(),
            course_name: course_name.unwrap_or_default(),
            grade: certificate.grade.clone(),
            issue_date: certificate
                .issue_date
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            instructor_name: certificate.instructor_name.clone(),
        })
    }
}
