//! Common error types for LearnPath

use thiserror::Error;

/// Common result type for LearnPath operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across LearnPath crates
///
/// The progress aggregator and the recommendation engine never produce
/// these; only the record store, configuration loading and input
/// validation do.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed data or request body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation conflicts with existing state (e.g. enrolling twice)
    #[error("Conflict: {0}")]
    Conflict(String),
}
