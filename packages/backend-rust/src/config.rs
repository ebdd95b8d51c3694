use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use eeg_bench_algo::artifacts::{ArtifactPaths, DEFAULT_BASELINES_PATH, DEFAULT_MODEL_PATH};
use eeg_bench_algo::classifier::{ClassifierConfig, ForestConfig};
use eeg_bench_algo::training::GenerationConfig;
use eeg_bench_algo::{DEFAULT_SAMPLE_COUNT, DEFAULT_SEED};

pub const DEFAULT_DATA_PATH: &str = "eeg_data.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub model_path: PathBuf,
    pub baselines_path: PathBuf,
    pub results_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_parse::<u16>("PORT").unwrap_or(8000);

        let host = env_parse::<IpAddr>("HOST").unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            host,
            port,
            log_level,
            model_path: env_string("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            baselines_path: env_string("BASELINES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BASELINES_PATH)),
            results_path: env_string("RESULTS_LOG_PATH").map(PathBuf::from),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(self.model_path.clone(), self.baselines_path.clone())
    }
}

/// Settings shared by the `generate-data` and `train-models` binaries
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub log_level: String,
    pub data_path: PathBuf,
    pub n_samples: usize,
    pub seed: u64,
    pub test_fraction: f64,
    pub n_estimators: usize,
    pub artifacts: ArtifactPaths,
}

impl BatchConfig {
    pub fn from_env() -> Self {
        let server = Config::from_env();
        Self {
            log_level: server.log_level.clone(),
            data_path: env_string("EEG_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            n_samples: env_parse("EEG_SAMPLES").unwrap_or(DEFAULT_SAMPLE_COUNT),
            seed: env_parse("EEG_SEED").unwrap_or(DEFAULT_SEED),
            test_fraction: env_parse::<f64>("EEG_TEST_FRACTION")
                .filter(|f| *f > 0.0 && *f < 1.0)
                .unwrap_or(0.2),
            n_estimators: env_parse::<usize>("EEG_TREES")
                .filter(|n| *n > 0)
                .unwrap_or(100),
            artifacts: server.artifact_paths(),
        }
    }

    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            n_samples: self.n_samples,
            seed: self.seed,
        }
    }

    pub fn classifier(&self) -> ClassifierConfig {
        ClassifierConfig {
            test_fraction: self.test_fraction,
            split_seed: self.seed,
            forest: ForestConfig {
                n_estimators: self.n_estimators,
                seed: self.seed,
                ..ForestConfig::default()
            },
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|value| value.parse::<T>().ok())
}
