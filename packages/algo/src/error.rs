use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Numeric edge cases (zero denominators, empty groups) are guarded locally
/// and never show up here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Baselines or classifier not loaded; retry after training
    #[error("models not trained yet")]
    ArtifactsNotReady,
    #[error("input data not found: {}", .0.display())]
    InputDataMissing(PathBuf),
    /// Model and baselines files come from different training runs
    #[error("artifact files do not match: model generation {model}, baselines generation {baselines}")]
    TornArtifacts { model: String, baselines: String },
    #[error("dataset is empty")]
    EmptyDataset,
    #[error("invalid train/test split: {0}")]
    InvalidSplit(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
