//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Error)]
pub enum Error {
    /// A wire line could not be parsed as a JSON record.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}
