//! Errors raised by local storage backends.

/// A failure of the underlying local store. Absence of a record is never an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("local storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialise stored record: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("local storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
