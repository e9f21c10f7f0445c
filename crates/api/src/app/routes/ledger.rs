//! Ledger read endpoints: rollup stats and the full block listing.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::SecondsFormat;

use certledger_ledger::LedgerStore;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/stats", get(stats))
        .route("/blocks", get(blocks))
}

pub async fn stats(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.stats.overview().await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn blocks(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let records = match services.ledger.list().await {
        Ok(records) => records,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let blocks: Vec<serde_json::Value> = records
        .into_iter()
        .map(|r| {
            serde_json::json!({
                "certificateId": r.certificate_id.to_string(),
                "hash": r.hash.to_string(),
                "blockNumber": r.block_number,
                "timestamp": r.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                "verified": r.verified,
            })
        })
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "blocks": blocks }))).into_response()
}
