use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::error::{Result, StoreError};

/// Whole-collection persistence for one collection.
///
/// Implementations hold no lock across a `load`/`save` pair, so two callers
/// doing read-modify-write on the same collection can overwrite each other.
#[async_trait]
pub trait CollectionStorage: Send + Sync {
    /// Read every row in stored order.
    async fn load(&self) -> Result<Vec<Value>>;

    /// Replace the stored collection with `rows`.
    async fn save(&self, rows: &[Value]) -> Result<()>;
}

/// A collection kept as a pretty-printed JSON array in
/// `{data_dir}/{collection}.json`.
///
/// The directory and an empty `[]` file are created on first use.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(data_dir: impl AsRef<Path>, collection: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{collection}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn ensure_file(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await.map_err(|e| self.io_error(e))?;
        }

        let exists = fs::try_exists(&self.path).await.map_err(|e| self.io_error(e))?;
        if !exists {
            fs::write(&self.path, b"[]").await.map_err(|e| self.io_error(e))?;
            info!("Initialized empty collection at {}", self.path.display());
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionStorage for JsonFileStorage {
    async fn load(&self) -> Result<Vec<Value>> {
        self.ensure_file().await?;
        let content = fs::read(&self.path).await.map_err(|e| self.io_error(e))?;
        serde_json::from_slice(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, rows: &[Value]) -> Result<()> {
        self.ensure_file().await?;
        let content = serde_json::to_vec_pretty(rows).map_err(StoreError::Encode)?;
        fs::write(&self.path, content).await.map_err(|e| self.io_error(e))
    }
}

/// In-process collection. Every `load` hands out a copy, so it has the same
/// read-modify-write behavior as the file backend.
#[derive(Default)]
pub struct MemoryStorage {
    rows: Mutex<Vec<Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl CollectionStorage for MemoryStorage {
    async fn load(&self) -> Result<Vec<Value>> {
        let rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.clone())
    }

    async fn save(&self, rows: &[Value]) -> Result<()> {
        let mut stored = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        *stored = rows.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn first_load_creates_directory_and_empty_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let storage = JsonFileStorage::new(&dir, "presentations");

        assert_eq!(storage.path(), dir.join("presentations.json"));
        assert!(!storage.path().exists());

        let rows = storage.load().await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(std::fs::read_to_string(storage.path()).unwrap(), "[]");
    }

    #[tokio::test]
    async fn save_overwrites_with_pretty_json() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(tmp.path(), "comments");

        storage.save(&[json!({ "id": "a" }), json!({ "id": "b" })]).await.unwrap();
        storage.save(&[json!({ "id": "c" })]).await.unwrap();

        let content = std::fs::read_to_string(storage.path()).unwrap();
        assert!(content.contains("\n  {"));
        assert_eq!(storage.load().await.unwrap(), vec![json!({ "id": "c" })]);
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(tmp.path(), "contentRequests");
        std::fs::write(storage.path(), "{ not json").unwrap();

        let err = storage.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "got {err:?}");

        std::fs::write(storage.path(), r#"{"id": "x"}"#).unwrap();
        let err = storage.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn unwritable_location_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();
        let storage = JsonFileStorage::new(&blocker, "presentations");

        let err = storage.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn memory_storage_round_trips_rows() {
        let storage = MemoryStorage::with_rows(vec![json!({ "id": "seed" })]);
        assert_eq!(storage.load().await.unwrap().len(), 1);

        storage.save(&[]).await.unwrap();
        assert!(storage.load().await.unwrap().is_empty());
    }
}
