//! Error types for the archive store.

/// Errors that can occur when talking to the archive store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object exists under the requested key
    #[error("object not found: {0}")]
    NotFound(String),

    /// Object storage error (network, auth, timeout, backend fault)
    #[error("object storage error: {0}")]
    Backend(#[source] object_store::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Whether this error means the key is absent, as opposed to the
    /// operation having failed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<object_store::Error> for StoreError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, .. } => StoreError::NotFound(path),
            other => StoreError::Backend(other),
        }
    }
}

/// Result type alias for archive store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
