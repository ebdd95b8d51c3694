use eeg_backend::config::BatchConfig;
use eeg_backend::logging::{init_tracing, LogTarget};

fn main() {
    let _ = dotenvy::dotenv();
    let config = BatchConfig::from_env();
    let _log_guard = init_tracing(LogTarget::GenerateData, &config.log_level);

    match eeg_bench_algo::training::generate_dataset_file(&config.data_path, &config.generation()) {
        Ok(dataset) => {
            for (group, count) in dataset.group_counts() {
                tracing::info!(group = %group, count, "age group rows");
            }
            tracing::info!(
                path = %config.data_path.display(),
                rows = dataset.len(),
                "dataset generated"
            );
        }
        Err(err) => {
            tracing::error!(error = %err, path = %config.data_path.display(), "dataset generation failed");
            std::process::exit(1);
        }
    }
}
