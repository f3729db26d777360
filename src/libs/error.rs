//! Typed error kinds for the persistence layer.
//!
//! Every repository operation returns [`StoreResult`], so callers can tell
//! apart bad input (`Validation`), a missing target row (`NotFound`), and a
//! lower-level store failure (`Storage` / `Io`). Reads for a single row signal
//! absence with `Ok(None)` instead of an error; `NotFound` is reserved for
//! operations that require the row to exist, such as `update`.

use thiserror::Error;

/// Convenience alias used throughout the `db` modules.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field is missing or out of range. Raised before any write
    /// is attempted.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The operation targeted an id that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Underlying SQLite failure (I/O, schema, constraint).
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Filesystem failure while locating or removing the store file.
    #[error("storage i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
