//! Age-Group Classifier
//!
//! Standardization followed by a random forest, trained on the seven feature
//! columns of the synthetic dataset against the age-group label.
//!
//! The classifier is a validation artifact: it shows the synthetic features
//! are separable by age group. Online scoring does not call it.

pub mod forest;
pub mod scaler;

use serde::{Deserialize, Serialize};

use crate::dataset::EegDataset;
use crate::error::EngineError;
use crate::random::SeededRandom;
use crate::sanitize::sanitize_feature_vector;
use crate::types::{AgeGroup, EegFeatures, EegRecord, DEFAULT_SEED};

pub use forest::{DecisionTree, FeatureRow, ForestConfig, RandomForest, TreeNode};
pub use scaler::StandardScaler;

// ==================== Configuration ====================

/// Training options for [`AgeGroupClassifier::fit`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Share of rows held out for evaluation (default: 0.2)
    pub test_fraction: f64,
    /// Seed for the train/test shuffle
    pub split_seed: u64,
    pub forest: ForestConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            split_seed: DEFAULT_SEED,
            forest: ForestConfig::default(),
        }
    }
}

// ==================== Train/Test Split ====================

/// Row indices of a shuffled train/test partition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n * test_fraction)` rows.
///
/// Fails when the fraction is outside `(0, 1)` or either side ends up empty.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<TrainTestSplit, EngineError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(EngineError::InvalidSplit(format!(
            "test fraction {test_fraction} must lie in (0, 1)"
        )));
    }

    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(EngineError::InvalidSplit(format!(
            "{n} rows cannot be split with test fraction {test_fraction}"
        )));
    }

    let mut rng = SeededRandom::new(seed);
    let mut order: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.next_index(i + 1);
        order.swap(i, j);
    }

    let train = order.split_off(n_test);
    Ok(TrainTestSplit { train, test: order })
}

// ==================== Classifier ====================

/// Trained standardizer + forest pipeline
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgeGroupClassifier {
    scaler: StandardScaler,
    forest: RandomForest,
    /// Held-out accuracy measured at training time
    pub test_accuracy: Option<f64>,
    pub train_size: usize,
    pub test_size: usize,
}

impl AgeGroupClassifier {
    /// Split, fit the scaler on the training rows only, fit the forest and
    /// score it on the held-out rows.
    pub fn fit(dataset: &EegDataset, config: &ClassifierConfig) -> Result<Self, EngineError> {
        if dataset.is_empty() {
            return Err(EngineError::EmptyDataset);
        }

        let split = train_test_split(dataset.len(), config.test_fraction, config.split_seed)?;
        let train: Vec<&EegRecord> = split.train.iter().map(|&i| &dataset.records[i]).collect();
        let test: Vec<&EegRecord> = split.test.iter().map(|&i| &dataset.records[i]).collect();

        let mut model = Self::fit_rows(&train, &config.forest);
        model.test_accuracy = Some(model.score(test.iter().copied()));
        model.test_size = test.len();
        Ok(model)
    }

    /// Fit on every given row without holding any out
    pub fn fit_rows(records: &[&EegRecord], forest: &ForestConfig) -> Self {
        let rows: Vec<FeatureRow> = records.iter().map(|r| r.features().to_array()).collect();
        let labels: Vec<usize> = records.iter().map(|r| r.age_group.to_index()).collect();

        let scaler = StandardScaler::fit(&rows);
        let scaled = scaler.transform_all(&rows);
        let forest = RandomForest::fit(&scaled, &labels, AgeGroup::ALL.len(), forest);

        Self {
            scaler,
            forest,
            test_accuracy: None,
            train_size: records.len(),
            test_size: 0,
        }
    }

    /// Class probabilities, indexed by [`AgeGroup::to_index`]
    pub fn predict_proba(&self, features: &EegFeatures) -> Vec<f64> {
        let mut row = features.to_array();
        sanitize_feature_vector(&mut row);
        self.forest.predict_proba(&self.scaler.transform(&row))
    }

    pub fn predict(&self, features: &EegFeatures) -> AgeGroup {
        let proba = self.predict_proba(features);
        AgeGroup::from_index(forest::argmax(&proba)).unwrap_or(AgeGroup::Child)
    }

    /// Fraction of rows whose predicted group matches the label.
    /// Returns 0 for no rows.
    pub fn score<'a, I>(&self, records: I) -> f64
    where
        I: IntoIterator<Item = &'a EegRecord>,
    {
        let mut total = 0usize;
        let mut correct = 0usize;
        for record in records {
            total += 1;
            if self.predict(&record.features()) == record.age_group {
                correct += 1;
            }
        }
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }
}
