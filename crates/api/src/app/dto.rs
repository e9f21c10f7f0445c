//! Request/response DTOs and JSON mapping helpers.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use certledger_registry::{Certificate, CertificateStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificateRequest {
    pub certificate_id: String,
    pub student_id: Option<String>,
    pub course_id: Option<String>,
    pub grade: String,
    pub score: Option<i32>,
    pub instructor_name: String,
    /// RFC3339.
    pub issue_date: DateTime<Utc>,
}

/// Body of `POST /verify`: exactly one of the two selectors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub certificate_id: Option<String>,
    pub hash: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    pub certificate_id: String,
    pub student_id: Option<String>,
    pub course_id: Option<String>,
    pub grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    pub instructor_name: String,
    pub issue_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_block_number: Option<u64>,
    pub status: CertificateStatus,
}

impl From<Certificate> for CertificateView {
    fn from(cert: Certificate) -> Self {
        Self {
            certificate_id: cert.certificate_id.to_string(),
            student_id: cert.student_id.map(|id| id.to_string()),
            course_id: cert.course_id.map(|id| id.to_string()),
            grade: cert.grade,
            score: cert.score,
            instructor_name: cert.instructor_name,
            issue_date: cert.issue_date.to_rfc3339_opts(SecondsFormat::Secs, true),
            ledger_hash: cert.ledger_hash.map(|h| h.to_string()),
            ledger_block_number: cert.ledger_block_number,
            status: cert.status,
        }
    }
}
