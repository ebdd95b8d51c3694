use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use eeg_bench_algo::{ResultEvent, UserSubmission};

use crate::response::AppError;
use crate::state::AppState;

/// Score a submission against the loaded baselines and record it.
///
/// A failed write to the result store is logged and the response still
/// succeeds with an empty `result_id`.
pub async fn submit_results(
    State(state): State<AppState>,
    Json(payload): Json<UserSubmission>,
) -> Result<Response, AppError> {
    let registry = state.registry();
    if !registry.is_ready() {
        let paths = state.artifact_paths().clone();
        let lazy = state.registry();
        let loaded = tokio::task::spawn_blocking(move || lazy.ensure_loaded(&paths))
            .await
            .map_err(|err| AppError::internal(err.to_string()))?;
        if !loaded {
            return Err(AppError::not_ready());
        }
    }

    let score = registry.score(&payload)?;
    let mut result = score.to_result();

    tracing::info!(
        age = payload.age,
        group = %score.age_group,
        overall = %format!("{:.1}", score.overall_score),
        benchmark = %format!("{:.1}", score.neural_benchmark),
        state = %score.state,
        "submission scored"
    );

    let store = state.result_store();
    if store.is_available() {
        let event = ResultEvent::new(&payload, &score, chrono::Utc::now().timestamp_millis());
        match store.save(&event).await {
            Ok(id) => result.result_id = id,
            Err(err) => tracing::warn!(error = %err, "failed to persist result"),
        }
    }

    Ok(Json(result).into_response())
}
