//! Certificate lifecycle endpoints: create, fetch, issue, verify.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::SecondsFormat;

use certledger_core::{CertificateId, CourseId, StudentId};
use certledger_registry::{Certificate, CertificateRepository};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/certificates", post(create_certificate))
        .route("/certificates/:id", get(get_certificate))
        .route("/certificates/:id/issue", post(issue_certificate))
        .route("/certificates/:id/verify", post(verify_certificate))
}

pub async fn create_certificate(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCertificateRequest>,
) -> axum::response::Response {
    let certificate_id = match CertificateId::new(body.certificate_id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };

    let student_id = match body.student_id.as_deref().map(StudentId::from_str).transpose() {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };
    let course_id = match body.course_id.as_deref().map(CourseId::from_str).transpose() {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };

    match services.registry.find(&certificate_id).await {
        Ok(Some(_)) => {
            return errors::json_error(
                StatusCode::CONFLICT,
                "conflict",
                format!("certificate already exists: {certificate_id}"),
            );
        }
        Ok(None) => {}
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "registry_error",
                e.to_string(),
            );
        }
    }

    let certificate = Certificate::new(
        certificate_id,
        student_id,
        course_id,
        body.grade,
        body.score,
        body.instructor_name,
        body.issue_date,
    );
    services.registry.upsert_certificate(certificate.clone());

    (StatusCode::CREATED, Json(dto::CertificateView::from(certificate))).into_response()
}

pub async fn get_certificate(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let certificate_id = match CertificateId::new(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };

    match services.registry.find(&certificate_id).await {
        Ok(Some(cert)) => (StatusCode::OK, Json(dto::CertificateView::from(cert))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "certificate not found"),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "registry_error",
            e.to_string(),
        ),
    }
}

pub async fn issue_certificate(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let certificate_id = match CertificateId::new(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };

    // Issuance is once-per-certificate; the handler guards, the store's
    // uniqueness constraint is the backstop.
    match services.registry.find(&certificate_id).await {
        Ok(Some(cert)) if cert.is_issued() => {
            return errors::json_error(
                StatusCode::CONFLICT,
                "conflict",
                format!("certificate already issued: {certificate_id}"),
            );
        }
        Ok(Some(_)) => {}
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "certificate not found");
        }
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "registry_error",
                e.to_string(),
            );
        }
    }

    match services.issuance.issue(&certificate_id).await {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "hash": receipt.hash.to_string(),
                "blockNumber": receipt.block_number,
                "timestamp": receipt.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            })),
        )
            .into_response(),
        Err(e) => errors::issuance_error_to_response(e),
    }
}

/// Verify a certificate, issuing it onto the ledger first if it has never
/// been recorded. First call writes, later calls check.
pub async fn verify_certificate(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let certificate_id = match CertificateId::new(id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };

    let issued = match services.registry.find(&certificate_id).await {
        Ok(Some(cert)) => cert.is_issued(),
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "certificate not found");
        }
        Err(e) => {
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "registry_error",
                e.to_string(),
            );
        }
    };

    if !issued {
        if let Err(e) = services.issuance.issue(&certificate_id).await {
            return errors::issuance_error_to_response(e);
        }
    }

    match services.verification.verify_by_id(&certificate_id).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => errors::verification_error_to_response(e),
    }
}
