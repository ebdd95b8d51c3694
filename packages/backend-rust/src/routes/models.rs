use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use eeg_bench_algo::ReloadOutcome;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/reload", post(reload))
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
struct ReloadResponse {
    /// Fresh artifacts were installed by this call
    success: bool,
    /// Whether any artifacts (fresh or previous) are serving
    models_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Re-read both artifacts from disk and swap them in.
///
/// 200 when fresh artifacts were installed, 503 when the files are absent,
/// 500 when they exist but could not be loaded. The last two keep whatever
/// was serving before.
async fn reload(State(state): State<AppState>) -> Response {
    let registry = state.registry();
    let paths = state.artifact_paths().clone();

    let outcome = match tokio::task::spawn_blocking(move || registry.reload(&paths)).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(error = %err, "model reload task failed");
            return reload_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                false,
                state.registry().is_ready(),
                Some("Model reload failed".to_string()),
            );
        }
    };

    let models_loaded = state.registry().is_ready();
    match outcome {
        ReloadOutcome::Reloaded => reload_response(StatusCode::OK, true, models_loaded, None),
        ReloadOutcome::Absent => reload_response(
            StatusCode::SERVICE_UNAVAILABLE,
            false,
            models_loaded,
            Some("Model files not found".to_string()),
        ),
        ReloadOutcome::Failed(err) => reload_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            false,
            models_loaded,
            Some(err.to_string()),
        ),
    }
}

fn reload_response(
    status: StatusCode,
    success: bool,
    models_loaded: bool,
    error: Option<String>,
) -> Response {
    (
        status,
        Json(ReloadResponse {
            success,
            models_loaded,
            error,
        }),
    )
        .into_response()
}
