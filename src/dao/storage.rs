use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Arguments rejected before the statement was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No row matched the requested title.
    #[error("game `{title}` not found")]
    NotFound {
        /// Title that was looked up.
        title: String,
    },
    /// A row with the same title already exists.
    #[error("game `{title}` already exists")]
    AlreadyExists {
        /// Title that collided.
        title: String,
    },
    /// The storage URL names a backend this build does not provide.
    #[error("unsupported storage url scheme `{scheme}`")]
    UnsupportedBackend {
        /// Scheme part of the rejected URL.
        scheme: String,
    },
    /// Any other driver or connectivity failure.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Short description of the failed step.
        message: String,
        /// Driver error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
