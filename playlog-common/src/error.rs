//! Common error types for playlog

use thiserror::Error;

/// Common result type for playlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across playlog crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Category code outside the closed category table
    #[error("Unknown category code: {0}")]
    UnknownCategoryCode(i64),

    /// Category field is neither a number nor a known category name
    #[error("Invalid category: {0:?}")]
    InvalidCategory(String),

    /// Malformed date, time or duration text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Offset arithmetic left the representable timestamp range
    #[error("Timestamp out of range: {0}")]
    OutOfRange(String),
}
