//! # eeg-bench-algo - EEG benchmark engine
//!
//! Pure Rust implementation of the age-conditioned EEG model and the
//! behavioral benchmark built on top of it:
//!
//! - **Feature Synthesizer** - closed-form band-power trends by age plus noise
//! - **Dataset Assembler** - seeded, labeled synthetic tables (CSV)
//! - **Baseline Aggregator** - per-age-group feature means
//! - **Age-Group Classifier** - standardization + random forest
//! - **Benchmark Scorer** - behavioral composite vs. group benchmark
//!
//! ## Module layout
//!
//! - [`types`] - age groups, feature vectors, constants
//! - [`random`] - injectable random source (seeded ChaCha8)
//! - [`synth`] - feature synthesis
//! - [`dataset`] - dataset generation and CSV I/O
//! - [`baseline`] - baseline aggregation
//! - [`classifier`] - scaler, decision trees, random forest
//! - [`scoring`] - benchmark scoring and result records
//! - [`interpret`] - verdict sentence
//! - [`artifacts`] - artifact persistence and the shared registry
//! - [`training`] - offline generation/training pipeline
//! - [`sanitize`] - numeric guards
//!
//! ## Example
//!
//! ```rust
//! use eeg_bench_algo::{AgeGroupBaselines, EegDataset, SeededRandom, UserSubmission, analyze};
//!
//! let dataset = EegDataset::generate(500, &mut SeededRandom::new(42));
//! let baselines = AgeGroupBaselines::aggregate(&dataset);
//!
//! let submission = UserSubmission {
//!     name: "demo".to_string(),
//!     age: 34,
//!     memory_score: 72.0,
//!     reaction_time: 420.0,
//!     attention_score: 65.0,
//!     spatial_score: 58.0,
//!     symbol_match_score: 61.0,
//! };
//! let result = analyze(&submission, &baselines);
//! assert_eq!(result.age_group.as_str(), "Adult");
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod artifacts;
pub mod baseline;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod interpret;
pub mod random;
pub mod sanitize;
pub mod scoring;
pub mod synth;
pub mod training;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use artifacts::{ArtifactPaths, ModelArtifacts, ModelRegistry, ReloadOutcome};
pub use baseline::{AgeGroupBaselines, BaselineRecord};
pub use classifier::{AgeGroupClassifier, ClassifierConfig, ForestConfig};
pub use dataset::EegDataset;
pub use error::EngineError;
pub use random::{RandomSource, SeededRandom};
pub use scoring::{
    analyze, score_submission, AnalysisResult, BenchmarkScore, EegComparison, ResultEvent,
    UserSubmission,
};
pub use synth::synthesize;
pub use training::{GenerationConfig, TrainingReport};
