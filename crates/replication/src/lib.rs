//! The coordinator: result cache, placement-driven request pipeline, and
//! heartbeat-based failure detection.

pub mod cache;
pub mod coordinator;
pub mod error;
pub mod sweep;

pub use cache::LruCache;
pub use coordinator::{session, CoordinatorState};
pub use error::{Error, Result};
