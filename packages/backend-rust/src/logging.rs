use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Which binary is logging. Picks the log file name and the directives
/// appended after `RUST_LOG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Server,
    GenerateData,
    TrainModels,
}

impl LogTarget {
    pub fn file_stem(&self) -> &'static str {
        match self {
            LogTarget::Server => "eeg-backend",
            LogTarget::GenerateData => "generate-data",
            LogTarget::TrainModels => "train-models",
        }
    }

    /// Server: hyper at warn, tower_http at info. Batch jobs: engine at info.
    fn extra_directives(&self) -> &'static [&'static str] {
        match self {
            LogTarget::Server => &["hyper=warn", "tower_http=info"],
            LogTarget::GenerateData | LogTarget::TrainModels => &["eeg_bench_algo=info"],
        }
    }

    /// `log_level` followed by this target's directives
    pub fn filter_directives(&self, log_level: &str) -> String {
        let mut directives = vec![log_level.trim()];
        directives.extend(self.extra_directives().iter().copied());
        directives.retain(|d| !d.is_empty());
        directives.join(",")
    }

    fn env_filter(&self, log_level: &str) -> EnvFilter {
        EnvFilter::try_new(self.filter_directives(log_level))
            .or_else(|_| EnvFilter::try_new(self.filter_directives("info")))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Keeps the non-blocking file writer alive; drop flushes pending lines
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

pub fn file_logging_enabled() -> bool {
    std::env::var("ENABLE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// Install the global subscriber for `target`, with a daily file under
/// `LOG_DIR` when `ENABLE_FILE_LOGS` is set
pub fn init_tracing(target: LogTarget, log_level: &str) -> Option<FileLogGuard> {
    let env_filter = target.env_filter(log_level);
    let stdout_layer = fmt::layer().with_target(target == LogTarget::Server);

    if file_logging_enabled() {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
        match std::fs::create_dir_all(&log_dir) {
            Ok(()) => {
                let file_appender = RollingFileAppender::new(
                    Rotation::DAILY,
                    &log_dir,
                    format!("{}.log", target.file_stem()),
                );
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(true);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .init();

                return Some(FileLogGuard { _guard: guard });
            }
            Err(err) => eprintln!("failed to create log directory {log_dir}: {err}"),
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .init();

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_directives_follow_log_level() {
        assert_eq!(
            LogTarget::Server.filter_directives("debug"),
            "debug,hyper=warn,tower_http=info"
        );
    }

    #[test]
    fn batch_targets_keep_engine_logs() {
        assert_eq!(
            LogTarget::TrainModels.filter_directives(" warn "),
            "warn,eeg_bench_algo=info"
        );
        assert_eq!(LogTarget::GenerateData.filter_directives(""), "eeg_bench_algo=info");
    }

    #[test]
    fn file_stems_are_distinct() {
        let stems = [
            LogTarget::Server.file_stem(),
            LogTarget::GenerateData.file_stem(),
            LogTarget::TrainModels.file_stem(),
        ];
        assert_eq!(stems, ["eeg-backend", "generate-data", "train-models"]);
    }

    #[test]
    fn invalid_level_still_builds_a_filter() {
        let filter = LogTarget::Server.env_filter("not a level ===");
        assert!(!filter.to_string().is_empty());
    }
}
