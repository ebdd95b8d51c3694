use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use eeg_bench_algo::ResultEvent;

#[derive(Debug, Clone, PartialEq)]
enum ResultStoreKind {
    JsonLines(PathBuf),
    Disabled,
}

#[derive(Debug, Error)]
pub enum ResultStoreError {
    #[error("result store not configured")]
    NotConfigured,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct StoredResult<'a> {
    id: &'a str,
    #[serde(flatten)]
    event: &'a ResultEvent,
}

/// Append-only store for scored submissions.
///
/// Writes are serialized through a mutex so concurrent requests never
/// interleave partial lines.
#[derive(Debug)]
pub struct ResultStore {
    kind: ResultStoreKind,
    write_lock: Mutex<()>,
}

impl ResultStore {
    pub fn jsonl(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: ResultStoreKind::JsonLines(path.into()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn disabled() -> Self {
        Self {
            kind: ResultStoreKind::Disabled,
            write_lock: Mutex::new(()),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.kind, ResultStoreKind::Disabled)
    }

    /// Persist one event and return its generated id
    pub async fn save(&self, event: &ResultEvent) -> Result<String, ResultStoreError> {
        let path = match &self.kind {
            ResultStoreKind::JsonLines(path) => path,
            ResultStoreKind::Disabled => return Err(ResultStoreError::NotConfigured),
        };

        let id = Uuid::new_v4().to_string();
        let mut line = serde_json::to_vec(&StoredResult { id: &id, event })?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        append(path, &line).await?;
        Ok(id)
    }
}

async fn append(path: &Path, line: &[u8]) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_bench_algo::{AgeGroupBaselines, UserSubmission};

    fn event() -> ResultEvent {
        let submission = UserSubmission {
            name: "ada".to_string(),
            age: 30,
            memory_score: 70.0,
            reaction_time: 500.0,
            attention_score: 60.0,
            spatial_score: 50.0,
            symbol_match_score: 40.0,
        };
        let score = eeg_bench_algo::score_submission(&submission, &AgeGroupBaselines::default());
        ResultEvent::new(&submission, &score, 1_700_000_000_000)
    }

    #[tokio::test]
    async fn disabled_store_refuses() {
        let store = ResultStore::disabled();
        assert!(!store.is_available());
        assert!(matches!(store.save(&event()).await, Err(ResultStoreError::NotConfigured)));
    }

    #[tokio::test]
    async fn appends_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("results.jsonl");
        let store = ResultStore::jsonl(&path);

        let first = store.save(&event()).await.unwrap();
        let second = store.save(&event()).await.unwrap();
        assert_ne!(first, second);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["id"], first.as_str());
        assert_eq!(parsed["name"], "ada");
        assert_eq!(parsed["age_group"], "Adult");
        assert_eq!(parsed["scores"]["reaction_score"], 62.5);
    }

    #[tokio::test]
    async fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::jsonl(dir.path());
        assert!(matches!(store.save(&event()).await, Err(ResultStoreError::Io(_))));
    }
}
