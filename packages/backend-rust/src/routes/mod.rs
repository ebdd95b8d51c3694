mod assessment;
mod health;
mod models;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use crate::response::ErrorResponse;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/submit-results", post(assessment::submit_results))
        .nest("/health", health::router())
        .nest("/models", models::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    let body = ErrorResponse {
        success: false,
        error: "Route not found".to_string(),
        code: "NOT_FOUND".to_string(),
    };
    (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
}
