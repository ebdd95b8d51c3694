use std::sync::Arc;
use std::time::{Instant, SystemTime};

use eeg_bench_algo::{ArtifactPaths, ModelRegistry};

use crate::config::Config;
use crate::persistence::ResultStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    registry: Arc<ModelRegistry>,
    artifact_paths: Arc<ArtifactPaths>,
    result_store: Arc<ResultStore>,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>, artifact_paths: ArtifactPaths, result_store: ResultStore) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            registry,
            artifact_paths: Arc::new(artifact_paths),
            result_store: Arc::new(result_store),
        }
    }

    /// Load whatever artifacts exist at the configured paths; absent files
    /// leave the registry empty
    pub fn from_config(config: &Config) -> Self {
        let paths = config.artifact_paths();
        let registry = Arc::new(ModelRegistry::load_or_empty(&paths));
        let result_store = match &config.results_path {
            Some(path) => ResultStore::jsonl(path.clone()),
            None => ResultStore::disabled(),
        };
        Self::new(registry, paths, result_store)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn registry(&self) -> Arc<ModelRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn artifact_paths(&self) -> &ArtifactPaths {
        &self.artifact_paths
    }

    pub fn result_store(&self) -> Arc<ResultStore> {
        Arc::clone(&self.result_store)
    }
}
