//! The coordinator: the process external clients and data nodes both talk
//! to. `session` dispatches accepted connections; `lifecycle` wires
//! bootstrap, the accept loop, and graceful shutdown together.

pub mod lifecycle;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use corelib::HashRing;

use crate::cache::LruCache;

/// Default bound on how long the coordinator waits for a single node RPC.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(2);

/// Default number of concurrently-served client/node sessions.
pub const DEFAULT_SESSION_CONCURRENCY: usize = 10;

/// Shared state every accepted connection's handler reads and mutates.
pub struct CoordinatorState {
    pub ring: Arc<HashRing>,
    pub cache: Arc<LruCache>,
    pub rpc_timeout: Duration,
}

impl CoordinatorState {
    /// Builds state with the default RPC timeout.
    pub fn new() -> Self {
        Self {
            ring: Arc::new(HashRing::new()),
            cache: Arc::new(LruCache::new()),
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
        }
    }
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self::new()
    }
}
