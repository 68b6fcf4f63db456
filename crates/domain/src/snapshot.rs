//! Exit destinations and the persisted world snapshot.
//!
//! A snapshot records place topology only: names, descriptions, things,
//! and exits. Occupants reference ephemeral live handles and are never
//! persisted; reload always starts every place empty.

use serde::{Deserialize, Serialize};

/// Where an exit leads.
///
/// The `Remote` form is a deferred descriptor: it is resolved to a live
/// place on every traversal and never cached, so a foreign server may
/// restart (invalidating any live reference) without breaking the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    /// A place registered on the same server, keyed by its unique name.
    Local { place: String },
    /// A place on another server: the host whose registry to consult,
    /// the world published there, and the place name within it.
    Remote {
        host: String,
        world: String,
        place: String,
    },
}

/// One thing lying around in a place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThingRecord {
    pub name: String,
    pub description: String,
}

/// One named, directed exit owned by its source place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRecord {
    pub name: String,
    pub destination: Destination,
}

/// Persisted form of a place. No occupant data, by design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    pub description: String,
    pub things: Vec<ThingRecord>,
    pub exits: Vec<ExitRecord>,
}

/// The full persisted place graph of one world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub world: String,
    pub entrance: String,
    pub places: Vec<PlaceRecord>,
}

impl Destination {
    /// Descriptor for a place on a foreign server.
    pub fn remote(host: impl Into<String>, world: impl Into<String>, place: impl Into<String>) -> Self {
        Self::Remote {
            host: host.into(),
            world: world.into(),
            place: place.into(),
        }
    }

    /// Reference to a co-located place.
    pub fn local(place: impl Into<String>) -> Self {
        Self::Local {
            place: place.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_tagged_encoding() {
        let local = Destination::local("Lobby");
        let json = serde_json::to_string(&local).expect("serialize");
        assert_eq!(json, r#"{"kind":"local","place":"Lobby"}"#);

        let remote = Destination::remote("mud.example.org:4000", "Plaza", "Fountain");
        let json = serde_json::to_string(&remote).expect("serialize");
        assert!(json.contains(r#""kind":"remote""#));
        let back: Destination = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, remote);
    }

    #[test]
    fn test_snapshot_has_no_occupant_fields() {
        let snapshot = WorldSnapshot {
            world: "Nutshell".into(),
            entrance: "Lobby".into(),
            places: vec![PlaceRecord {
                name: "Lobby".into(),
                description: "A dusty lobby".into(),
                things: vec![ThingRecord {
                    name: "lamp".into(),
                    description: "It flickers".into(),
                }],
                exits: vec![ExitRecord {
                    name: "north".into(),
                    destination: Destination::local("Hall"),
                }],
            }],
        };
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert!(json["places"][0].get("occupants").is_none());
        assert!(json["places"][0].get("names").is_none());
    }
}
