//! Error types for the data node.

use thiserror::Error;

/// Result type alias for the node crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors a connection handler or the heartbeat sender can encounter.
#[derive(Debug, Error)]
pub enum Error {
    /// The peer closed the connection before a full request line arrived.
    #[error("connection closed before a request was read")]
    ConnectionClosed,

    /// I/O failure on the connection (read, write, or datagram send).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The request line was not a valid wire record.
    #[error(transparent)]
    Protocol(#[from] corelib::Error),
}
