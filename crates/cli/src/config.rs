//! The shared `cs_config.txt` discovery file: two lines, coordinator IP then
//! port. Written once by the coordinator at start; read by nodes on
//! register and by clients on connect.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// The coordinator's published stream address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterConfig {
    pub ip: String,
    pub port: u16,
}

impl ClusterConfig {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self { ip: ip.into(), port }
    }

    /// The default discovery file path, relative to the current directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("cs_config.txt")
    }

    /// Writes `ip` then `port` as two lines to `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        let contents = format!("{}\n{}\n", self.ip, self.port);
        fs::write(path, contents).with_context(|| format!("writing cluster config to {}", path.display()))
    }

    /// Reads the two-line `ip`/`port` file at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading cluster config from {}", path.display()))?;
        let mut lines = contents.lines();
        let ip = lines
            .next()
            .context("cluster config missing coordinator ip line")?
            .trim()
            .to_string();
        let port: u16 = lines
            .next()
            .context("cluster config missing coordinator port line")?
            .trim()
            .parse()
            .context("cluster config port line is not a valid port number")?;
        Ok(Self { ip, port })
    }
}

impl fmt::Display for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_file() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("cs_config_test_{}.txt", std::process::id()));
        let config = ClusterConfig::new("127.0.0.1", 9000);

        config.write(&path).unwrap();
        let read_back = ClusterConfig::read(&path).unwrap();
        assert_eq!(read_back, config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_a_non_numeric_port_line() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("cs_config_test_bad_{}.txt", std::process::id()));
        std::fs::write(&path, "127.0.0.1\nnot-a-port\n").unwrap();

        assert!(ClusterConfig::read(&path).is_err());

        let _ = std::fs::remove_file(&path);
    }
}
