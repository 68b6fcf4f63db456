//! The world registry: one server's named place set plus snapshot
//! persistence.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use mudlink_domain::{MudFault, PlaceRecord, ServerAddr, WorldSnapshot};

use crate::federation::Federation;
use crate::world::place::Place;

/// Failure of a `dump` call: either the domain rejection (bad password)
/// or a server-side I/O problem, which is outside the domain taxonomy.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error(transparent)]
    Fault(#[from] MudFault),
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One world: its name, its named places, its persistence gate.
///
/// Lives for the whole process. Place registration happens internally
/// (from `Place::open` and from restore); external callers only ever
/// look places up.
pub struct MudServer {
    world: String,
    password: String,
    addr: ServerAddr,
    entrance: String,
    places: DashMap<String, Arc<Place>>,
    federation: Arc<Federation>,
}

impl MudServer {
    /// Start a fresh world with one bootstrap place, the entrance.
    pub fn bootstrap(
        world: impl Into<String>,
        password: impl Into<String>,
        addr: ServerAddr,
        federation: Arc<Federation>,
        entrance_name: &str,
        entrance_description: &str,
    ) -> Result<Arc<Self>, MudFault> {
        let server = Arc::new(Self {
            world: world.into(),
            password: password.into(),
            addr,
            entrance: entrance_name.to_string(),
            places: DashMap::new(),
            federation,
        });
        Place::open(&server, entrance_name, entrance_description)?;
        tracing::info!(world = %server.world, entrance = %entrance_name, "world bootstrapped");
        Ok(server)
    }

    /// Rebuild a world from a snapshot. Every place is registered before
    /// anything can traverse into it, with empty occupancy; cross-server
    /// descriptors restore unconditionally.
    pub fn restore(
        snapshot: WorldSnapshot,
        password: impl Into<String>,
        addr: ServerAddr,
        federation: Arc<Federation>,
    ) -> Result<Arc<Self>, MudFault> {
        let server = Arc::new(Self {
            world: snapshot.world,
            password: password.into(),
            addr,
            entrance: snapshot.entrance,
            places: DashMap::new(),
            federation,
        });
        for record in snapshot.places {
            server.register_place(&Place::from_record(record))?;
        }
        if !server.places.contains_key(&server.entrance) {
            return Err(MudFault::NoSuchPlace);
        }
        tracing::info!(world = %server.world, places = server.places.len(), "world restored from snapshot");
        Ok(server)
    }

    pub fn mud_name(&self) -> &str {
        &self.world
    }

    /// Public RPC address of this server, carried in handles it hands out.
    pub fn addr(&self) -> &ServerAddr {
        &self.addr
    }

    pub fn federation(&self) -> &Federation {
        &self.federation
    }

    /// Record a place under its name. Invoked by place construction,
    /// never directly by external callers.
    pub fn register_place(&self, place: &Arc<Place>) -> Result<(), MudFault> {
        match self.places.entry(place.name().to_string()) {
            dashmap::Entry::Occupied(_) => Err(MudFault::PlaceAlreadyExists),
            dashmap::Entry::Vacant(entry) => {
                entry.insert(Arc::clone(place));
                Ok(())
            }
        }
    }

    /// The bootstrap place.
    pub fn get_entrance(&self) -> Result<Arc<Place>, MudFault> {
        self.get_named_place(&self.entrance)
    }

    /// Look up a registered place by name.
    pub fn get_named_place(&self, name: &str) -> Result<Arc<Place>, MudFault> {
        self.places
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(MudFault::NoSuchPlace)
    }

    /// The full persisted place graph. Concurrent mutation is not
    /// blocked: each place's lists are snapshotted under their own locks,
    /// so the result may be inconsistent across places. Documented
    /// limitation.
    pub async fn snapshot(&self) -> WorldSnapshot {
        let mut places: Vec<PlaceRecord> = Vec::with_capacity(self.places.len());
        let handles: Vec<Arc<Place>> = self
            .places
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for place in handles {
            places.push(place.record().await);
        }
        // Stable order keeps successive dumps diffable.
        places.sort_by(|a, b| a.name.cmp(&b.name));
        WorldSnapshot {
            world: self.world.clone(),
            entrance: self.entrance.clone(),
            places,
        }
    }

    /// Serialize the place graph to the named file. The password is
    /// checked before anything is touched; a mismatch writes nothing.
    pub async fn dump(&self, password: &str, target: impl AsRef<Path>) -> Result<(), DumpError> {
        if password != self.password {
            return Err(MudFault::BadPassword.into());
        }
        let snapshot = self.snapshot().await;
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(target.as_ref(), bytes).await?;
        tracing::info!(
            world = %self.world,
            target = %target.as_ref().display(),
            places = snapshot.places.len(),
            "world dumped"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{test_federation, test_server, TestPerson, TEST_ADDR};
    use crate::world::person::PersonHandle;
    use mudlink_domain::{
        Destination, ExitRecord, PlaceRecord, ThingRecord, WorldSnapshot,
    };

    fn sample_snapshot() -> WorldSnapshot {
        WorldSnapshot {
            world: "Alpha".into(),
            entrance: "Lobby".into(),
            places: vec![
                PlaceRecord {
                    name: "Hall".into(),
                    description: "A long hall".into(),
                    things: vec![],
                    exits: vec![
                        ExitRecord {
                            name: "portal".into(),
                            destination: Destination::remote("peer.example", "Beta", "Plaza"),
                        },
                        ExitRecord {
                            name: "south".into(),
                            destination: Destination::local("Lobby"),
                        },
                    ],
                },
                PlaceRecord {
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
                },
            ],
        }
    }

    #[tokio::test]
    async fn duplicate_place_name_is_rejected() {
        let server = test_server("Alpha");
        let duplicate = Place::open(&server, "Lobby", "Another lobby");
        assert!(matches!(duplicate, Err(MudFault::PlaceAlreadyExists)));
    }

    #[tokio::test]
    async fn unknown_place_lookup_is_a_fault() {
        let server = test_server("Alpha");
        assert!(matches!(
            server.get_named_place("Basement"),
            Err(MudFault::NoSuchPlace)
        ));
    }

    #[tokio::test]
    async fn restore_rebuilds_the_snapshot_topology() {
        let server = MudServer::restore(
            sample_snapshot(),
            "hunter2",
            ServerAddr::new(TEST_ADDR),
            test_federation(),
        )
        .expect("restore");

        assert_eq!(server.mud_name(), "Alpha");
        assert_eq!(server.get_entrance().expect("entrance").name(), "Lobby");
        let hall = server.get_named_place("Hall").expect("hall");
        assert!(hall.names().await.is_empty());
        assert_eq!(server.snapshot().await, sample_snapshot());
    }

    #[tokio::test]
    async fn restore_without_its_entrance_fails() {
        let mut snapshot = sample_snapshot();
        snapshot.entrance = "Basement".into();
        let result = MudServer::restore(
            snapshot,
            "hunter2",
            ServerAddr::new(TEST_ADDR),
            test_federation(),
        );
        assert!(matches!(result, Err(MudFault::NoSuchPlace)));
    }

    #[tokio::test]
    async fn dump_with_a_bad_password_writes_nothing() {
        let server = test_server("Alpha");
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("world.json");

        let result = server.dump("letmein", &target).await;
        assert!(matches!(result, Err(DumpError::Fault(MudFault::BadPassword))));
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn dump_then_restore_reproduces_the_world() {
        let server = test_server("Alpha");
        let lobby = server.get_entrance().expect("entrance");
        let alice = TestPerson::new();
        lobby
            .enter(alice.as_person(), "Alice", None)
            .await
            .expect("enter");
        lobby
            .create_thing(alice.addr(), "lamp", "It flickers")
            .await
            .expect("create_thing");
        lobby
            .create_place(&server, alice.addr(), "north", "south", "Hall", "A long hall")
            .await
            .expect("create_place");

        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("world.json");
        server.dump("hunter2", &target).await.expect("dump");

        let bytes = tokio::fs::read(&target).await.expect("read");
        let snapshot: WorldSnapshot = serde_json::from_slice(&bytes).expect("decode");
        let restored = MudServer::restore(
            snapshot,
            "hunter2",
            ServerAddr::new(TEST_ADDR),
            test_federation(),
        )
        .expect("restore");

        assert_eq!(restored.snapshot().await, server.snapshot().await);
        // Occupancy never survives a reload.
        assert!(restored
            .get_entrance()
            .expect("entrance")
            .names()
            .await
            .is_empty());
    }
}
