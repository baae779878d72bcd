//! Catalog-specific error types.

use std::path::PathBuf;

/// Errors that can occur while loading a service catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file
    #[error("Failed to load catalog from {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the catalog file
    #[error("Failed to deserialize catalog: {0}")]
    DeserializationFailed(String),

    /// Two entries share an identifier
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// An alias or notification points at a service that does not exist
    #[error("{origin} references unknown service: {service_id}")]
    DanglingReference { origin: String, service_id: String },
}
