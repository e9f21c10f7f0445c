//! Student/course record endpoints (the registry stands in for the external
//! system that owns these records).

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::dto;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/students", post(create_student))
        .route("/courses", post(create_course))
}

pub async fn create_student(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateStudentRequest>,
) -> axum::response::Response {
    let id = services.registry.add_student(body.name);
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id.to_string() })),
    )
        .into_response()
}

pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCourseRequest>,
) -> axum::response::Response {
    let id = services.registry.add_course(body.name);
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id.to_string() })),
    )
        .into_response()
}
