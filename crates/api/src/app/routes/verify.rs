//! Public verification endpoint: read-only, by certificate id or by hash.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use certledger_core::{CertificateId, Fingerprint};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/verify", post(verify))
}

pub async fn verify(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::VerifyRequest>,
) -> axum::response::Response {
    match (body.certificate_id, body.hash) {
        (Some(id), None) => {
            let certificate_id = match CertificateId::new(id) {
                Ok(id) => id,
                Err(e) => {
                    return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string());
                }
            };
            match services.verification.verify_by_id(&certificate_id).await {
                Ok(result) => (StatusCode::OK, Json(result)).into_response(),
                Err(e) => errors::verification_error_to_response(e),
            }
        }
        (None, Some(hash)) => {
            let hash = match Fingerprint::parse(hash) {
                Ok(h) => h,
                Err(e) => {
                    return errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "invalid_hash",
                        e.to_string(),
                    );
                }
            };
            match services.verification.verify_by_hash(&hash).await {
                Ok(result) => (StatusCode::OK, Json(result)).into_response(),
                Err(e) => errors::verification_error_to_response(e),
            }
        }
        _ => errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "provide exactly one of certificateId or hash",
        ),
    }
}
