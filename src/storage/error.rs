use std::path::PathBuf;
use thiserror::Error;

// StorageError is the lowest level error type, wrapping errors from the chest file and its
// codec. It does not wrap any higher level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Chest file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Chest file could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON or does not follow the schema
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A chest cannot be represented in the document
    #[error("chest at {location}: {message}")]
    Encode { location: String, message: String },

    /// A single chest entry could not be resolved
    #[error("chest entry #{index}: {message}")]
    Decode { index: usize, message: String },
}
