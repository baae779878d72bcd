//! Session store-specific error types.

use std::path::PathBuf;

/// Errors that can occur while reading or writing the session store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to find home directory
    #[error("Failed to find home directory")]
    HomeDirectoryNotFound,

    /// Failed to read the session file
    #[error("Failed to load session from {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the session file
    #[error("Failed to save session to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Session file content is not a key/value map
    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    /// Session content could not be serialized
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),
}
