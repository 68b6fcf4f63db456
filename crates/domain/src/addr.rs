//! Network addresses for servers and occupant handles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::PersonId;

/// Prefix for naming-service keys, to keep world names from colliding
/// with anything else published on the same registry host.
pub const MUD_PREFIX: &str = "mud";

/// The naming-service key under which a world is published:
/// `mud.{world}`.
pub fn registry_key(world: &str) -> String {
    format!("{MUD_PREFIX}.{world}")
}

/// Address of a server's RPC endpoint, as `host:port`.
///
/// This is what a deferred exit descriptor stores and what remote
/// handles carry; it stays valid across restarts of the process it
/// names, which is why descriptors store it instead of a live reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerAddr(String);

impl ServerAddr {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base URL for RPC calls against this server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.0)
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network-addressable identity of one occupant handle.
///
/// Presence checks compare these: an occupant is "the same person" when
/// both the owning server and the id match, regardless of display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonAddr {
    /// The server that owns (can deliver to) this occupant.
    pub server: ServerAddr,
    /// Unique id of the occupant on that server.
    pub id: PersonId,
}

impl PersonAddr {
    pub fn new(server: ServerAddr, id: PersonId) -> Self {
        Self { server, id }
    }
}

impl fmt::Display for PersonAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_key_is_prefixed() {
        assert_eq!(registry_key("Nutshell"), "mud.Nutshell");
    }

    #[test]
    fn test_person_addr_equality_ignores_nothing() {
        let id = PersonId::new();
        let a = PersonAddr::new(ServerAddr::new("mud.example.org:4000"), id);
        let b = PersonAddr::new(ServerAddr::new("mud.example.org:4000"), id);
        let c = PersonAddr::new(ServerAddr::new("other.example.org:4000"), id);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
