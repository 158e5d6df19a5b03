//! The data node: holds two key-value tables and serves coordinator-issued
//! operations against them, while beaconing liveness on a fixed cadence.

pub mod error;
pub mod handler;
pub mod heartbeat;
pub mod store;

pub use error::{Error, Result};
pub use store::Store;
