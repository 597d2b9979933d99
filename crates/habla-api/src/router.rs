use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{auth, lesson, practice, state::ApiState};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .merge(lesson::routes())
        .merge(practice::routes())
        .fallback(not_found)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("No route for {}", uri.path()) })),
    )
}
