//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use certledger_ledger::{IssuanceError, LedgerError, VerificationError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn issuance_error_to_response(err: IssuanceError) -> axum::response::Response {
    match err {
        IssuanceError::CertificateNotFound(id) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("certificate not found: {id}"),
        ),
        IssuanceError::Ledger(e) => ledger_error_to_response(e),
        IssuanceError::Registry(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "registry_error", e.to_string())
        }
    }
}

pub fn verification_error_to_response(err: VerificationError) -> axum::response::Response {
    match err {
        VerificationError::Ledger(e) => ledger_error_to_response(e),
        VerificationError::Registry(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "registry_error", e.to_string())
        }
    }
}

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::DuplicateCertificate(id) => json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("certificate already recorded on the ledger: {id}"),
        ),
        LedgerError::Storage(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}
