use axum::Router;

pub mod certificates;
pub mod ledger;
pub mod registry;
pub mod system;
pub mod verify;

/// Router for all application endpoints.
pub fn router() -> Router {
    Router::new()
        .merge(registry::router())
        .merge(certificates::router())
        .merge(verify::router())
        .nest("/ledger", ledger::router())
}
