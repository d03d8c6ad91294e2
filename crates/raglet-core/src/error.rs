//! Error type shared across the Raglet crates.

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RagletError>;

/// All the ways a Raglet operation can fail.
///
/// The taxonomy is deliberately flat: the gateway only distinguishes
/// "bad request", "not found", "dependency unavailable", and
/// "everything else" when mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum RagletError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl RagletError {
    /// Whether this error means an external dependency is unreachable,
    /// as opposed to a caller mistake.
    pub fn is_dependency_unavailable(&self) -> bool {
        matches!(
            self,
            RagletError::Database(_) | RagletError::Cache(_) | RagletError::VectorStore(_)
        )
    }
}
