//! Node identity for the hash ring.
//!
//! A node is identified purely by its `ip:port` endpoint string; there is no
//! separate metadata record (no datacenter/rack labels, no vnode fan-out —
//! one identity occupies exactly one ring position).

use std::fmt;

/// Identity of a data node, the string `ip:port`.
///
/// Newtype over `String` so call sites can't accidentally pass a bare key or
/// value where an identity is expected.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Builds an identity from an `ip` and `port` pair.
    pub fn new(ip: impl AsRef<str>, port: u16) -> Self {
        Self(format!("{}:{}", ip.as_ref(), port))
    }

    /// Borrows the underlying `ip:port` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_ip_port_string() {
        let id = NodeId::new("127.0.0.1", 8081);
        assert_eq!(id.as_str(), "127.0.0.1:8081");
    }

    #[test]
    fn displays_as_identity_string() {
        let id = NodeId::from("10.0.0.1:9000");
        assert_eq!(format!("{id}"), "10.0.0.1:9000");
    }
}
