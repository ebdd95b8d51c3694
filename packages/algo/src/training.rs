//! Offline Training Pipeline
//!
//! Dataset file in, classifier + baseline artifacts out. Any failure aborts
//! before the artifact files are touched.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifacts::{ArtifactPaths, ModelArtifacts};
use crate::baseline::AgeGroupBaselines;
use crate::classifier::{AgeGroupClassifier, ClassifierConfig};
use crate::dataset::EegDataset;
use crate::error::EngineError;
use crate::random::SeededRandom;
use crate::types::{AgeGroup, DEFAULT_SAMPLE_COUNT, DEFAULT_SEED};

/// Batch generation options
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub n_samples: usize,
    pub seed: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            n_samples: DEFAULT_SAMPLE_COUNT,
            seed: DEFAULT_SEED,
        }
    }
}

/// Summary of a completed training run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingReport {
    pub rows: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub test_accuracy: f64,
    pub group_counts: BTreeMap<AgeGroup, usize>,
}

/// Generate the seeded dataset and write it as CSV
pub fn generate_dataset_file(path: impl AsRef<Path>, config: &GenerationConfig) -> Result<EegDataset, EngineError> {
    let mut rng = SeededRandom::new(config.seed);
    let dataset = EegDataset::generate(config.n_samples, &mut rng);
    dataset.write_csv(path.as_ref())?;

    tracing::info!(
        path = %path.as_ref().display(),
        rows = dataset.len(),
        seed = config.seed,
        "synthetic dataset written"
    );
    Ok(dataset)
}

/// Fit the classifier and aggregate baselines from an in-memory dataset
pub fn train(dataset: &EegDataset, config: &ClassifierConfig) -> Result<(ModelArtifacts, TrainingReport), EngineError> {
    if dataset.is_empty() {
        return Err(EngineError::EmptyDataset);
    }

    let classifier = AgeGroupClassifier::fit(dataset, config)?;
    let test_accuracy = classifier.test_accuracy.unwrap_or(0.0);
    tracing::info!(
        accuracy = %format!("{test_accuracy:.2}"),
        trees = classifier.n_trees(),
        train = classifier.train_size,
        test = classifier.test_size,
        "classifier trained"
    );

    let baselines = AgeGroupBaselines::aggregate(dataset);
    for (group, record) in baselines.iter() {
        tracing::debug!(
            group = %group,
            samples = record.sample_count,
            beta = record.beta,
            entropy = record.entropy,
            "baseline aggregated"
        );
    }

    let report = TrainingReport {
        rows: dataset.len(),
        train_size: classifier.train_size,
        test_size: classifier.test_size,
        test_accuracy,
        group_counts: dataset.group_counts(),
    };

    Ok((
        ModelArtifacts {
            classifier,
            baselines,
        },
        report,
    ))
}

/// Read the dataset at `data_path`, train, and write both artifacts.
///
/// A missing dataset fails with [`EngineError::InputDataMissing`] and leaves
/// `paths` untouched.
pub fn train_from_file(
    data_path: impl AsRef<Path>,
    paths: &ArtifactPaths,
    config: &ClassifierConfig,
) -> Result<TrainingReport, EngineError> {
    let dataset = EegDataset::read_csv(data_path)?;
    let (artifacts, report) = train(&dataset, config)?;
    artifacts.save(paths)?;

    tracing::info!(
        model = %paths.model.display(),
        baselines = %paths.baselines.display(),
        "models and baselines saved"
    );
    Ok(report)
}
