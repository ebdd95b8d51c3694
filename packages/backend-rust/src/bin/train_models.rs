use eeg_backend::config::BatchConfig;
use eeg_backend::logging::{init_tracing, LogTarget};

fn main() {
    let _ = dotenvy::dotenv();
    let config = BatchConfig::from_env();
    let _log_guard = init_tracing(LogTarget::TrainModels, &config.log_level);

    tracing::info!(
        data = %config.data_path.display(),
        trees = config.n_estimators,
        test_fraction = config.test_fraction,
        seed = config.seed,
        "training started"
    );

    match eeg_bench_algo::training::train_from_file(&config.data_path, &config.artifacts, &config.classifier()) {
        Ok(report) => {
            tracing::info!(
                rows = report.rows,
                train = report.train_size,
                test = report.test_size,
                accuracy = %format!("{:.2}", report.test_accuracy),
                "training complete"
            );
        }
        Err(err) => {
            tracing::error!(error = %err, "training failed");
            if matches!(err, eeg_bench_algo::EngineError::InputDataMissing(_)) {
                tracing::error!("run generate-data first");
            }
            std::process::exit(1);
        }
    }
}
