use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Append-only, per-stream durable storage for snapshot ticks (§4.2) and
/// execution history (§4.6). Grounded on `run::state::RunState::save`,
/// which serializes to JSON and writes the whole file back — here each
/// append is one JSON-lines record rather than a full rewrite, since the
/// streams this backs are write-heavy and read-rarely.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn append(&self, stream: &str, record: serde_json::Value) -> std::io::Result<()>;
    async fn read_all(&self, stream: &str) -> std::io::Result<Vec<serde_json::Value>>;
}

/// Process-lifetime storage, good enough for tests and simulation runs.
#[derive(Default)]
pub struct InMemoryStore {
    streams: RwLock<HashMap<String, Vec<serde_json::Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore { streams: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn append(&self, stream: &str, record: serde_json::Value) -> std::io::Result<()> {
        let mut streams = self.streams.write().await;
        streams.entry(stream.to_string()).or_default().push(record);
        Ok(())
    }

    async fn read_all(&self, stream: &str) -> std::io::Result<Vec<serde_json::Value>> {
        let streams = self.streams.read().await;
        Ok(streams.get(stream).cloned().unwrap_or_default())
    }
}

/// One JSON-lines file per stream under `root_dir`, appended to with each
/// call. Mirrors `RuntimeConfig`'s file-under-a-configured-directory
/// convention from the teacher's `run::config`.
pub struct FileStore {
    root_dir: PathBuf,
}

impl FileStore {
    pub fn new(root_dir: PathBuf) -> Self {
        FileStore { root_dir }
    }

    fn path_for(&self, stream: &str) -> PathBuf {
        self.root_dir.join(format!("{stream}.jsonl"))
    }
}

#[async_trait]
impl DurableStore for FileStore {
    async fn append(&self, stream: &str, record: serde_json::Value) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(stream))
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn read_all(&self, stream: &str) -> std::io::Result<Vec<serde_json::Value>> {
        let path = self.path_for(stream);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = tokio::fs::read_to_string(path).await?;
        let mut records = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(line)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_store_round_trips_records() {
        let store = InMemoryStore::new();
        store.append("ticks", serde_json::json!({"n": 1})).await.unwrap();
        store.append("ticks", serde_json::json!({"n": 2})).await.unwrap();
        let records = store.read_all("ticks").await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn unknown_stream_reads_as_empty() {
        let store = InMemoryStore::new();
        assert!(store.read_all("nothing").await.unwrap().is_empty());
    }
}
