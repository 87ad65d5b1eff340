//! Error types for the data-access layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Failures reported by the backing data store.
///
/// The layer never rewrites these; they surface to callers exactly as the
/// store produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness or referential constraint rejected the write
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The store could not be reached or refused the connection
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the query shape itself
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

// == Layer Error Enum ==
/// Unified error type for the bulk and search layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Batch options that cannot schedule any work, rejected before
    /// the first batch is dispatched
    #[error("invalid batch options: {0}")]
    InvalidOptions(String),

    /// Propagated store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == Result Type Alias ==
/// Convenience Result type for the data-access layer.
pub type Result<T> = std::result::Result<T, Error>;
