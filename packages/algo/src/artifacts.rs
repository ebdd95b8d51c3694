//! Trained Artifacts
//!
//! Loading, saving and process-wide sharing of the classifier and baseline map.
//!
//! [`ModelRegistry`] starts empty when the files are absent and reports
//! readiness through [`ModelRegistry::is_ready`]. Reloads build a complete
//! [`ModelArtifacts`] first and then swap the shared `Arc` in a single write,
//! so a request holding the previous snapshot keeps a consistent view.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::baseline::AgeGroupBaselines;
use crate::classifier::AgeGroupClassifier;
use crate::error::EngineError;
use crate::scoring::{score_submission, BenchmarkScore, UserSubmission};

pub const DEFAULT_MODEL_PATH: &str = "eeg_age_classifier.json";
pub const DEFAULT_BASELINES_PATH: &str = "age_group_baselines.json";

/// Locations of the two persisted artifacts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub baselines: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            baselines: PathBuf::from(DEFAULT_BASELINES_PATH),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, baselines: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            baselines: baselines.into(),
        }
    }

    pub fn exist(&self) -> bool {
        self.model.exists() && self.baselines.exists()
    }
}

/// Immutable classifier + baseline pair
#[derive(Clone, Debug)]
pub struct ModelArtifacts {
    pub classifier: AgeGroupClassifier,
    pub baselines: AgeGroupBaselines,
}

impl ModelArtifacts {
    /// Read both artifacts. `Ok(None)` when either file is absent.
    ///
    /// Both files carry the generation stamp of the `save` that wrote them;
    /// a pair from two different runs is rejected as [`EngineError::TornArtifacts`].
    pub fn load(paths: &ArtifactPaths) -> Result<Option<Self>, EngineError> {
        if !paths.exist() {
            return Ok(None);
        }
        let classifier: StoredArtifact<AgeGroupClassifier> = read_json(&paths.model)?;
        let baselines: StoredArtifact<AgeGroupBaselines> = read_json(&paths.baselines)?;
        if classifier.generation != baselines.generation {
            return Err(EngineError::TornArtifacts {
                model: classifier.generation,
                baselines: baselines.generation,
            });
        }
        Ok(Some(Self {
            classifier: classifier.payload,
            baselines: baselines.payload,
        }))
    }

    /// Write both artifacts under a fresh generation stamp.
    ///
    /// Both are serialized to sibling temp files first; the final names
    /// appear only after both writes succeeded. A crash between the two
    /// renames leaves mismatched stamps, which `load` refuses.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(), EngineError> {
        let generation = next_generation();
        let model_tmp = write_json_tmp(
            &paths.model,
            &StoredArtifact {
                generation: generation.clone(),
                payload: &self.classifier,
            },
        )?;
        let baselines_tmp = match write_json_tmp(
            &paths.baselines,
            &StoredArtifact {
                generation,
                payload: &self.baselines,
            },
        ) {
            Ok(tmp) => tmp,
            Err(err) => {
                let _ = fs::remove_file(&model_tmp);
                return Err(err);
            }
        };

        fs::rename(&model_tmp, &paths.model)?;
        fs::rename(&baselines_tmp, &paths.baselines)?;
        Ok(())
    }
}

/// On-disk envelope shared by both artifact files
#[derive(Serialize, Deserialize)]
struct StoredArtifact<T> {
    generation: String,
    payload: T,
}

static SAVE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique per save: wall-clock nanos, process id and an in-process counter
fn next_generation() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let count = SAVE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{nanos:x}-{:x}-{count:x}", std::process::id())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_json_tmp<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf, EngineError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let result = (|| -> Result<(), EngineError> {
        let mut file = fs::File::create(&tmp)?;
        serde_json::to_writer(&mut file, value)?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(tmp)
}

// ==================== Registry ====================

/// Result of [`ModelRegistry::reload`]
#[derive(Debug)]
pub enum ReloadOutcome {
    /// Fresh artifacts were read and installed
    Reloaded,
    /// Either file is missing; nothing changed
    Absent,
    /// The files exist but could not be used; nothing changed
    Failed(EngineError),
}

impl ReloadOutcome {
    pub fn is_reloaded(&self) -> bool {
        matches!(self, ReloadOutcome::Reloaded)
    }
}

/// Process-wide holder of the loaded artifacts
#[derive(Debug, Default)]
pub struct ModelRegistry {
    current: RwLock<Option<Arc<ModelArtifacts>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated from `paths`, or empty when the artifacts are
    /// absent or unreadable
    pub fn load_or_empty(paths: &ArtifactPaths) -> Self {
        let registry = Self::new();
        registry.reload(paths);
        registry
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().is_some()
    }

    /// Current artifacts, or [`EngineError::ArtifactsNotReady`]
    pub fn snapshot(&self) -> Result<Arc<ModelArtifacts>, EngineError> {
        self.current
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(EngineError::ArtifactsNotReady)
    }

    /// Replace the artifacts in one step
    pub fn install(&self, artifacts: ModelArtifacts) {
        *self.current.write() = Some(Arc::new(artifacts));
    }

    pub fn clear(&self) {
        *self.current.write() = None;
    }

    /// Re-read the artifacts and swap them in.
    ///
    /// Absent files and unreadable files both leave the current artifacts
    /// installed; the outcome says which case happened.
    pub fn reload(&self, paths: &ArtifactPaths) -> ReloadOutcome {
        match ModelArtifacts::load(paths) {
            Ok(Some(artifacts)) => {
                tracing::info!(
                    model = %paths.model.display(),
                    baselines = %paths.baselines.display(),
                    groups = artifacts.baselines.len(),
                    "models loaded"
                );
                self.install(artifacts);
                ReloadOutcome::Reloaded
            }
            Ok(None) => {
                tracing::info!(
                    model = %paths.model.display(),
                    baselines = %paths.baselines.display(),
                    "models not found, training needed"
                );
                ReloadOutcome::Absent
            }
            Err(err) => {
                tracing::warn!(error = %err, kept_previous = self.is_ready(), "failed to load models");
                ReloadOutcome::Failed(err)
            }
        }
    }

    /// Load lazily if nothing is installed yet. Returns readiness.
    pub fn ensure_loaded(&self, paths: &ArtifactPaths) -> bool {
        if self.is_ready() {
            return true;
        }
        self.reload(paths);
        self.is_ready()
    }

    /// Score a submission against the installed baselines.
    ///
    /// Refuses with [`EngineError::ArtifactsNotReady`] instead of falling back
    /// to zero baselines.
    pub fn score(&self, submission: &UserSubmission) -> Result<BenchmarkScore, EngineError> {
        let artifacts = self.snapshot()?;
        Ok(score_submission(submission, &artifacts.baselines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifierConfig, ForestConfig};
    use crate::dataset::EegDataset;
    use crate::random::SeededRandom;
    use crate::types::{AgeGroup, CognitiveState};

    fn trained() -> ModelArtifacts {
        let dataset = EegDataset::generate(300, &mut SeededRandom::default());
        let config = ClassifierConfig {
            forest: ForestConfig {
                n_estimators: 5,
                ..ForestConfig::default()
            },
            ..ClassifierConfig::default()
        };
        ModelArtifacts {
            classifier: AgeGroupClassifier::fit(&dataset, &config).unwrap(),
            baselines: AgeGroupBaselines::aggregate(&dataset),
        }
    }

    fn submission() -> UserSubmission {
        UserSubmission {
            name: "reader".to_string(),
            age: 10,
            memory_score: 80.0,
            reaction_time: 400.0,
            attention_score: 70.0,
            spatial_score: 0.0,
            symbol_match_score: 0.0,
        }
    }

    #[test]
    fn test_empty_registry_refuses_to_score() {
        let registry = ModelRegistry::new();
        assert!(!registry.is_ready());
        assert!(matches!(registry.snapshot(), Err(EngineError::ArtifactsNotReady)));
        assert!(matches!(registry.score(&submission()), Err(EngineError::ArtifactsNotReady)));
    }

    #[test]
    fn test_missing_files_are_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("m.json"), dir.path().join("b.json"));

        assert!(ModelArtifacts::load(&paths).unwrap().is_none());
        let registry = ModelRegistry::load_or_empty(&paths);
        assert!(!registry.is_ready());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(
            dir.path().join("nested").join("m.json"),
            dir.path().join("b.json"),
        );
        let artifacts = trained();
        artifacts.save(&paths).unwrap();

        assert!(paths.exist());
        assert!(!dir.path().join("b.json.tmp").exists());

        let registry = ModelRegistry::load_or_empty(&paths);
        assert!(registry.is_ready());
        let loaded = registry.snapshot().unwrap();
        assert_eq!(loaded.baselines, artifacts.baselines);
        assert_eq!(loaded.classifier.test_accuracy, artifacts.classifier.test_accuracy);
    }

    #[test]
    fn test_corrupt_file_leaves_registry_empty() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("m.json"), dir.path().join("b.json"));
        fs::write(&paths.model, b"{not json").unwrap();
        fs::write(&paths.baselines, b"{}").unwrap();

        assert!(ModelArtifacts::load(&paths).is_err());
        assert!(!ModelRegistry::load_or_empty(&paths).is_ready());
    }

    #[test]
    fn test_ensure_loaded_picks_up_new_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("m.json"), dir.path().join("b.json"));
        let registry = ModelRegistry::load_or_empty(&paths);
        assert!(!registry.ensure_loaded(&paths));

        trained().save(&paths).unwrap();
        assert!(registry.ensure_loaded(&paths));
        assert!(registry.score(&submission()).is_ok());
    }

    #[test]
    fn test_swap_keeps_old_snapshot_intact() {
        let registry = ModelRegistry::new();
        let first = trained();
        registry.install(first.clone());
        let held = registry.snapshot().unwrap();

        let mut replacement = first;
        replacement.baselines = AgeGroupBaselines::default();
        registry.install(replacement);

        assert!(!held.baselines.is_empty());
        assert!(registry.snapshot().unwrap().baselines.is_empty());

        let score = registry.score(&submission()).unwrap();
        assert_eq!(score.age_group, AgeGroup::Child);
        assert_eq!(score.neural_benchmark, 0.0);
        assert_eq!(score.state, CognitiveState::Excelling);
    }

    #[test]
    fn test_reload_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("m.json"), dir.path().join("b.json"));
        let registry = ModelRegistry::new();

        assert!(matches!(registry.reload(&paths), ReloadOutcome::Absent));

        trained().save(&paths).unwrap();
        assert!(registry.reload(&paths).is_reloaded());
        assert!(registry.is_ready());
    }

    #[test]
    fn test_failed_reload_keeps_previous_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path().join("m.json"), dir.path().join("b.json"));
        trained().save(&paths).unwrap();
        let registry = ModelRegistry::load_or_empty(&paths);
        let before = registry.snapshot().unwrap();

        fs::write(&paths.baselines, b"{not json").unwrap();
        let outcome = registry.reload(&paths);

        assert!(matches!(outcome, ReloadOutcome::Failed(EngineError::Json(_))));
        assert!(!outcome.is_reloaded());
        assert!(registry.is_ready());
        assert!(Arc::ptr_eq(&before, &registry.snapshot().unwrap()));
    }

    #[test]
    fn test_mismatched_pair_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let first = ArtifactPaths::new(dir.path().join("m1.json"), dir.path().join("b1.json"));
        let second = ArtifactPaths::new(dir.path().join("m2.json"), dir.path().join("b2.json"));
        let artifacts = trained();
        artifacts.save(&first).unwrap();
        artifacts.save(&second).unwrap();

        // New model next to baselines from an earlier run
        fs::copy(&second.model, &first.model).unwrap();

        assert!(matches!(
            ModelArtifacts::load(&first),
            Err(EngineError::TornArtifacts { .. })
        ));
        assert!(!ModelRegistry::load_or_empty(&first).is_ready());
        assert!(ModelArtifacts::load(&second).unwrap().is_some());
    }

    #[test]
    fn test_clear_resets_readiness() {
        let registry = ModelRegistry::new();
        registry.install(trained());
        assert!(registry.is_ready());
        registry.clear();
        assert!(!registry.is_ready());
    }
}
