pub mod config;
pub mod error;
pub mod queries;
pub mod storage;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use podium_types::models::{CommentData, ContentRequestData, PresentationData};

use crate::config::{StorageBackend, StoreConfig};
use crate::storage::{CollectionStorage, JsonFileStorage, MemoryStorage};
use crate::store::DocumentStore;

pub use crate::error::{Result, StoreError};
pub use crate::store::Filter;

pub const PRESENTATIONS: &str = "presentations";
pub const COMMENTS: &str = "comments";
pub const CONTENT_REQUESTS: &str = "contentRequests";

/// Presentations plus the comments and content requests attached to them,
/// one document store per collection.
///
/// Collections are independent: nothing here is transactional across them,
/// and deleting a presentation leaves its comments and requests behind.
pub struct Database {
    presentations: DocumentStore<PresentationData>,
    comments: DocumentStore<CommentData>,
    content_requests: DocumentStore<ContentRequestData>,
}

impl Database {
    pub fn open(config: &StoreConfig) -> Self {
        match &config.backend {
            StorageBackend::Json { data_dir } => Self::open_dir(data_dir),
            StorageBackend::Memory => Self::in_memory(),
        }
    }

    /// JSON files under `data_dir`. Nothing touches the disk until first use.
    pub fn open_dir(data_dir: &Path) -> Self {
        let db = Self::from_storage(
            Arc::new(JsonFileStorage::new(data_dir, PRESENTATIONS)),
            Arc::new(JsonFileStorage::new(data_dir, COMMENTS)),
            Arc::new(JsonFileStorage::new(data_dir, CONTENT_REQUESTS)),
        );
        info!("Database opened at {}", data_dir.display());
        db
    }

    pub fn in_memory() -> Self {
        Self::from_storage(
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
        )
    }

    pub fn from_storage(
        presentations: Arc<dyn CollectionStorage>,
        comments: Arc<dyn CollectionStorage>,
        content_requests: Arc<dyn CollectionStorage>,
    ) -> Self {
        Self {
            presentations: DocumentStore::new(PRESENTATIONS, presentations),
            comments: DocumentStore::new(COMMENTS, comments),
            content_requests: DocumentStore::new(CONTENT_REQUESTS, content_requests),
        }
    }

    pub fn presentations(&self) -> &DocumentStore<PresentationData> {
        &self.presentations
    }

    pub fn comments(&self) -> &DocumentStore<CommentData> {
        &self.comments
    }

    pub fn content_requests(&self) -> &DocumentStore<ContentRequestData> {
        &self.content_requests
    }
}
