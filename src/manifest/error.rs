use thiserror::Error;

/// Errors that can occur while persisting the manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;
