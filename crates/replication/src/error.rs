//! Error types for the coordinator.

use thiserror::Error;

/// Result type alias for the replication crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors the coordinator's session handler or lifecycle can encounter.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure talking to a client or a node.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A reply line from a node could not be parsed.
    #[error(transparent)]
    Protocol(#[from] corelib::Error),
}
