use std::path::PathBuf;

use thiserror::Error;

use podium_types::models::InvalidOfferAmount;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id in the collection.
    #[error("{collection}: no document with id {id}")]
    NotFound { collection: String, id: String },

    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON array.
    #[error("malformed collection file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A stored row does not have the shape of the collection's entity.
    #[error("{collection}: undecodable document: {source}")]
    Decode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),

    /// The encoded document would not decode again, e.g. a NaN encoded as `null`.
    #[error("{collection}: document would not read back: {source}")]
    Unreadable {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    InvalidOfferAmount(#[from] InvalidOfferAmount),

    /// The patch is not an object, or merging it would leave an invalid record.
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
