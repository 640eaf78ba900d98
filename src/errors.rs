//! Error types for the record store.
//!
//! Only storage-engine and configuration failures are errors. Expected
//! negative outcomes (duplicate vocabulary tag, unknown ident) are encoded
//! in return values: `false`, zero row count, empty result set.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
