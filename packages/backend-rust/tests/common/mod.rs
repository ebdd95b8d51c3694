#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;

use eeg_backend::persistence::ResultStore;
use eeg_backend::state::AppState;
use eeg_bench_algo::{
    AgeGroup, AgeGroupBaselines, ArtifactPaths, BaselineRecord, ClassifierConfig, EegDataset,
    ForestConfig, ModelArtifacts, ModelRegistry, SeededRandom,
};

/// App wired to artifact and result paths inside a private temp dir
pub struct TestApp {
    pub dir: TempDir,
    pub paths: ArtifactPaths,
    pub state: AppState,
}

impl TestApp {
    pub fn router(&self) -> Router {
        eeg_backend::build_app(self.state.clone())
    }

    pub fn results_path(&self) -> PathBuf {
        self.dir.path().join("results.jsonl")
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_store(|_| ResultStore::disabled())
}

pub fn create_test_app_with_store(store: impl FnOnce(&TempDir) -> ResultStore) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = ArtifactPaths::new(
        dir.path().join("eeg_age_classifier.json"),
        dir.path().join("age_group_baselines.json"),
    );
    let registry = Arc::new(ModelRegistry::load_or_empty(&paths));
    let store = store(&dir);
    let state = AppState::new(registry, paths.clone(), store);
    TestApp { dir, paths, state }
}

/// Small forest trained on synthetic rows; baselines replaced when given
pub fn write_artifacts(paths: &ArtifactPaths, baselines: Option<AgeGroupBaselines>) {
    let dataset = EegDataset::generate(300, &mut SeededRandom::default());
    let config = ClassifierConfig {
        forest: ForestConfig {
            n_estimators: 5,
            ..ForestConfig::default()
        },
        ..ClassifierConfig::default()
    };
    let (mut artifacts, _report): (ModelArtifacts, _) =
        eeg_bench_algo::training::train(&dataset, &config).expect("train");
    if let Some(baselines) = baselines {
        artifacts.baselines = baselines;
    }
    artifacts.save(paths).expect("save artifacts");
}

pub fn child_baselines() -> AgeGroupBaselines {
    let mut baselines = AgeGroupBaselines::default();
    baselines.insert(
        AgeGroup::Child,
        BaselineRecord {
            delta: 3.6,
            theta: 3.0,
            alpha: 3.0,
            beta: 2.0,
            theta_alpha: 1.0,
            alpha_beta: 1.5,
            entropy: 0.6,
            sample_count: 100,
        },
    );
    baselines
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn reference_submission() -> serde_json::Value {
    serde_json::json!({
        "name": "Reference",
        "age": 10,
        "memory_score": 80.0,
        "reaction_time": 400.0,
        "attention_score": 70.0,
        "spatial_score": 0.0,
        "symbol_match_score": 0.0
    })
}
