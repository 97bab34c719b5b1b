//! Error types for the M2O state store.

use m2o_core::LedgerError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization of a store envelope failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The key cannot be stored.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidKey(key) => Self::InvalidInput(format!("invalid state key {key:?}")),
            StoreError::Database(_) | StoreError::Serialization(_) => {
                Self::StoreUnavailable(err.to_string())
            }
        }
    }
}
