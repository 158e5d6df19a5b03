//! Shared CLI plumbing for the three entry points (`coordinator`, `node`,
//! `client`): the cluster discovery file and common logging setup.

pub mod config;

pub use config::ClusterConfig;

/// Initializes `tracing` from `RUST_LOG`, defaulting to `info` when unset.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
