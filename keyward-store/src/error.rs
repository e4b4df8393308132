//! Error types for the store layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur reading or writing options.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store failed.
    #[error("storage error: {0}")]
    Backend(String),

    /// A stored option holds a value that cannot be interpreted.
    #[error("invalid value for option {name}: {value}")]
    InvalidValue { name: String, value: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}
