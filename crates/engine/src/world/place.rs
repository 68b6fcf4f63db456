//! One node of the world graph.
//!
//! A place guards its three mutable lists — things, exits, occupants —
//! with three independent locks, so operations on different places run
//! fully in parallel and same-place operations interleave only at the
//! grain of those sections. Broadcast always snapshots the occupant list
//! and releases the lock before delivering anything over the network:
//! one slow or unreachable occupant never blocks visibility of place
//! state for anyone else.

use std::sync::Arc;

use tokio::sync::Mutex;

use mudlink_domain::{Destination, ExitRecord, MudFault, PersonAddr, PlaceRecord, ThingRecord};

use crate::federation::RemotePlace;
use crate::world::person::SharedPerson;
use crate::world::server::MudServer;

/// A thing lying around in a place.
#[derive(Debug, Clone)]
pub struct Thing {
    pub name: String,
    pub description: String,
}

struct ExitEntry {
    name: String,
    destination: Destination,
}

struct OccupantEntry {
    name: String,
    handle: SharedPerson,
}

/// A place ("room") in the world graph.
///
/// Identity is the name, unique within one server. Places are created by
/// an occupant's `create_place` or at bootstrap, and never deleted —
/// closing the exits to a place merely orphans it.
pub struct Place {
    name: String,
    description: String,
    things: Mutex<Vec<Thing>>,
    exits: Mutex<Vec<ExitEntry>>,
    // Live, never persisted. Reload always starts this empty.
    occupants: Mutex<Vec<OccupantEntry>>,
}

/// What a traversal lands on: a co-located place, or a freshly resolved
/// place on a foreign server.
pub enum PlaceRef {
    Local(Arc<Place>),
    Remote(RemotePlace),
}

impl PlaceRef {
    pub fn name(&self) -> &str {
        match self {
            Self::Local(place) => place.name(),
            Self::Remote(remote) => remote.name(),
        }
    }

    async fn enter(&self, who: &SharedPerson, name: &str, message: &str) -> Result<(), MudFault> {
        match self {
            Self::Local(place) => place.enter(Arc::clone(who), name, Some(message)).await,
            Self::Remote(remote) => remote
                .enter(who.addr(), name, Some(message))
                .await
                .map_err(|e| e.into_fault(MudFault::LinkFailed)),
        }
    }
}

impl Place {
    /// Create a place and register it with the server so it is reachable
    /// by name. Fails with `PlaceAlreadyExists` on a name collision.
    pub fn open(
        server: &MudServer,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Arc<Self>, MudFault> {
        let place = Arc::new(Self::bare(name, description));
        server.register_place(&place)?;
        Ok(place)
    }

    /// Rebuild a place from its persisted record. Occupancy starts empty;
    /// the caller is responsible for registering the place before any
    /// local exit referencing it is traversed.
    pub fn from_record(record: PlaceRecord) -> Arc<Self> {
        let things = record
            .things
            .into_iter()
            .map(|t| Thing {
                name: t.name,
                description: t.description,
            })
            .collect();
        let exits = record
            .exits
            .into_iter()
            .map(|e| ExitEntry {
                name: e.name,
                destination: e.destination,
            })
            .collect();
        Arc::new(Self {
            name: record.name,
            description: record.description,
            things: Mutex::new(things),
            exits: Mutex::new(exits),
            occupants: Mutex::new(Vec::new()),
        })
    }

    fn bare(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            things: Mutex::new(Vec::new()),
            exits: Mutex::new(Vec::new()),
            occupants: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Display names of everyone currently here.
    pub async fn names(&self) -> Vec<String> {
        self.occupants
            .lock()
            .await
            .iter()
            .map(|o| o.name.clone())
            .collect()
    }

    /// Names of the things lying around here.
    pub async fn thing_names(&self) -> Vec<String> {
        self.things.lock().await.iter().map(|t| t.name.clone()).collect()
    }

    /// Names of the exits leading out of here.
    pub async fn exit_names(&self) -> Vec<String> {
        self.exits.lock().await.iter().map(|e| e.name.clone()).collect()
    }

    /// Handle of the named occupant. On duplicate display names the
    /// first match wins; lookup-by-name is only well-defined for unique
    /// names.
    pub async fn get_person(&self, name: &str) -> Result<SharedPerson, MudFault> {
        self.occupants
            .lock()
            .await
            .iter()
            .find(|o| o.name == name)
            .map(|o| Arc::clone(&o.handle))
            .ok_or(MudFault::NoSuchPerson)
    }

    /// Description of the named thing.
    pub async fn examine_thing(&self, name: &str) -> Result<String, MudFault> {
        self.things
            .lock()
            .await
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.description.clone())
            .ok_or(MudFault::NoSuchThing)
    }

    /// Traverse the named exit.
    ///
    /// A deferred (cross-server) destination is resolved now, through the
    /// naming collaborator and the foreign server, and never cached — the
    /// foreign process may have restarted since the link was made.
    ///
    /// Removal from here and insertion over there are not atomic: a
    /// failure in between leaves the actor in no place at all, and
    /// recovery is the client re-invoking `enter`. Accepted limitation.
    pub async fn go(
        self: &Arc<Self>,
        server: &MudServer,
        who: SharedPerson,
        exit: &str,
    ) -> Result<PlaceRef, MudFault> {
        let destination = {
            let exits = self.exits.lock().await;
            exits
                .iter()
                .find(|e| e.name == exit)
                .map(|e| e.destination.clone())
                .ok_or(MudFault::NoSuchExit)?
        };

        let target = match destination {
            Destination::Local { place } => {
                // A registered name can only dangle after a mismatched
                // restore; treat it like a broken link.
                PlaceRef::Local(
                    server
                        .get_named_place(&place)
                        .map_err(|_| MudFault::LinkFailed)?,
                )
            }
            Destination::Remote { host, world, place } => {
                let remote_server = server
                    .federation()
                    .lookup_server(&host, &world)
                    .await
                    .map_err(|e| {
                        tracing::debug!(host = %host, world = %world, error = %e, "link resolution failed");
                        MudFault::LinkFailed
                    })?;
                let remote_place = remote_server
                    .get_named_place(&place)
                    .await
                    .map_err(|e| e.into_fault(MudFault::LinkFailed))?;
                PlaceRef::Remote(remote_place)
            }
        };

        let name = self.verify_presence(who.addr()).await?;

        self.leave(who.addr(), Some(&format!("{name} has gone {exit}")))
            .await;

        let from = match &target {
            PlaceRef::Local(_) => self.name.clone(),
            PlaceRef::Remote(_) => format!("{}.{}", server.mud_name(), self.name),
        };
        target
            .enter(&who, &name, &format!("{name} has arrived from: {from}"))
            .await?;

        tracing::debug!(who = %name, from = %self.name, exit = %exit, to = %target.name(), "traversal");
        Ok(target)
    }

    /// Say something to everyone here.
    pub async fn speak(self: &Arc<Self>, who: &PersonAddr, message: &str) -> Result<(), MudFault> {
        let name = self.verify_presence(who).await?;
        self.tell_everyone(format!("{name}: {message}")).await;
        Ok(())
    }

    /// Do something everyone here can see.
    pub async fn act(self: &Arc<Self>, who: &PersonAddr, message: &str) -> Result<(), MudFault> {
        let name = self.verify_presence(who).await?;
        self.tell_everyone(format!("{name} {message}")).await;
        Ok(())
    }

    /// Put a new thing here.
    pub async fn create_thing(
        self: &Arc<Self>,
        who: &PersonAddr,
        name: &str,
        description: &str,
    ) -> Result<(), MudFault> {
        let creator = self.verify_presence(who).await?;
        {
            let mut things = self.things.lock().await;
            if things.iter().any(|t| t.name == name) {
                return Err(MudFault::AlreadyThere);
            }
            things.push(Thing {
                name: name.to_string(),
                description: description.to_string(),
            });
        }
        self.tell_everyone(format!("{creator} has created a {name}"))
            .await;
        Ok(())
    }

    /// Remove a thing from here.
    pub async fn destroy_thing(self: &Arc<Self>, who: &PersonAddr, name: &str) -> Result<(), MudFault> {
        let destroyer = self.verify_presence(who).await?;
        {
            let mut things = self.things.lock().await;
            let index = things
                .iter()
                .position(|t| t.name == name)
                .ok_or(MudFault::NoSuchThing)?;
            things.remove(index);
        }
        self.tell_everyone(format!("{destroyer} has destroyed the {name}"))
            .await;
        Ok(())
    }

    /// Open a new place, registered with this server and bidirectionally
    /// wired to this one. The exit lock is held through the whole wiring
    /// so exit names stay unique under concurrent creation.
    pub async fn create_place(
        self: &Arc<Self>,
        server: &MudServer,
        who: &PersonAddr,
        exit: &str,
        entrance: &str,
        name: &str,
        description: &str,
    ) -> Result<(), MudFault> {
        let creator = self.verify_presence(who).await?;
        {
            let mut exits = self.exits.lock().await;
            if exits.iter().any(|e| e.name == exit) {
                return Err(MudFault::ExitAlreadyExists);
            }
            let destination = Place::open(server, name, description)?;
            {
                let mut back_exits = destination.exits.lock().await;
                back_exits.push(ExitEntry {
                    name: entrance.to_string(),
                    destination: Destination::local(&self.name),
                });
            }
            exits.push(ExitEntry {
                name: exit.to_string(),
                destination: Destination::local(name),
            });
        }
        self.tell_everyone(format!("{creator} has created a new place: {exit}"))
            .await;
        Ok(())
    }

    /// Link an exit to a named place in a named world on a named host,
    /// possibly on another server. The target is probed eagerly, but only
    /// the deferred descriptor is stored — never a live reference.
    ///
    /// Unidirectional by design: wiring both directions atomically across
    /// two independent servers is exactly the kind of distributed
    /// transaction this system refuses to attempt. The return path is a
    /// second call made from the far side.
    pub async fn link_to(
        self: &Arc<Self>,
        server: &MudServer,
        who: &PersonAddr,
        exit: &str,
        host: &str,
        world: &str,
        place: &str,
    ) -> Result<(), MudFault> {
        let linker = self.verify_presence(who).await?;

        // NoSuchPlace here may equally mean "no such world" or "world not
        // responding"; the caller cannot tell the difference and does not
        // need to.
        let remote_server = server
            .federation()
            .lookup_server(host, world)
            .await
            .map_err(|e| {
                tracing::debug!(host = %host, world = %world, error = %e, "link probe failed");
                MudFault::NoSuchPlace
            })?;
        remote_server
            .get_named_place(place)
            .await
            .map_err(|e| e.into_fault(MudFault::NoSuchPlace))?;

        {
            let mut exits = self.exits.lock().await;
            if exits.iter().any(|e| e.name == exit) {
                return Err(MudFault::ExitAlreadyExists);
            }
            exits.push(ExitEntry {
                name: exit.to_string(),
                destination: Destination::remote(host, world, place),
            });
        }
        self.tell_everyone(format!(
            "{linker} has linked {exit} to '{place}' in MUD '{world}' on host {host}"
        ))
        .await;
        Ok(())
    }

    /// Remove an exit. Never touches a reciprocal exit on the far side,
    /// and never destroys the place the exit led to.
    pub async fn close(self: &Arc<Self>, who: &PersonAddr, exit: &str) -> Result<(), MudFault> {
        let closer = self.verify_presence(who).await?;
        {
            let mut exits = self.exits.lock().await;
            let index = exits
                .iter()
                .position(|e| e.name == exit)
                .ok_or(MudFault::NoSuchExit)?;
            exits.remove(index);
        }
        self.tell_everyone(format!("{closer} has closed exit {exit}"))
            .await;
        Ok(())
    }

    /// Put an occupant into this place. The announcement goes to the
    /// people already here, before the newcomer is listed, so they never
    /// hear their own arrival. Also used to restore someone bumped out by
    /// a failed delivery.
    pub async fn enter(
        self: &Arc<Self>,
        who: SharedPerson,
        name: &str,
        message: Option<&str>,
    ) -> Result<(), MudFault> {
        if let Some(message) = message {
            self.tell_everyone(message.to_string()).await;
        }
        let mut occupants = self.occupants.lock().await;
        if occupants.iter().any(|o| o.handle.addr() == who.addr()) {
            return Err(MudFault::AlreadyThere);
        }
        occupants.push(OccupantEntry {
            name: name.to_string(),
            handle: who,
        });
        Ok(())
    }

    /// Remove an occupant from this place, telling everyone left about it.
    /// A silent no-op if they are not here — used for best-effort cleanup
    /// on disconnect and for evictions, which must never fail.
    pub async fn leave(self: &Arc<Self>, who: &PersonAddr, message: Option<&str>) {
        let removed = {
            let mut occupants = self.occupants.lock().await;
            match occupants.iter().position(|o| o.handle.addr() == who) {
                Some(index) => Some(occupants.remove(index)),
                None => None,
            }
        };
        if removed.is_some() {
            if let Some(message) = message {
                self.tell_everyone(message.to_string()).await;
            }
        }
    }

    /// Persisted form of this place: topology only, no occupants.
    pub async fn record(&self) -> PlaceRecord {
        let things = self
            .things
            .lock()
            .await
            .iter()
            .map(|t| ThingRecord {
                name: t.name.clone(),
                description: t.description.clone(),
            })
            .collect();
        let exits = self
            .exits
            .lock()
            .await
            .iter()
            .map(|e| ExitRecord {
                name: e.name.clone(),
                destination: e.destination.clone(),
            })
            .collect();
        PlaceRecord {
            name: self.name.clone(),
            description: self.description.clone(),
            things,
            exits,
        }
    }

    /// Snapshot the occupant list, release the lock, then deliver to each
    /// recipient concurrently in a detached task. The calling operation
    /// never waits for delivery, and delivery order is unspecified. A
    /// recipient whose handle fails is silently evicted.
    fn tell_everyone(
        self: &Arc<Self>,
        message: String,
    ) -> futures_util::future::BoxFuture<'_, ()> {
        Box::pin(async move {
            let recipients: Vec<(String, SharedPerson)> = {
                let occupants = self.occupants.lock().await;
                occupants
                    .iter()
                    .map(|o| (o.name.clone(), Arc::clone(&o.handle)))
                    .collect()
            };
            if recipients.is_empty() {
                return;
            }
            let place = Arc::clone(self);
            tokio::spawn(async move {
                let deliveries = recipients.into_iter().map(|(name, handle)| {
                    let place = Arc::clone(&place);
                    let message = message.clone();
                    async move {
                        if let Err(e) = handle.tell(&message).await {
                            tracing::debug!(
                                place = %place.name,
                                occupant = %name,
                                error = %e,
                                "delivery failed, evicting occupant"
                            );
                            place.leave(handle.addr(), None).await;
                        }
                    }
                });
                futures_util::future::join_all(deliveries).await;
            });
        })
    }

    /// Check that `who` is here; returns their display name.
    async fn verify_presence(&self, who: &PersonAddr) -> Result<String, MudFault> {
        self.occupants
            .lock()
            .await
            .iter()
            .find(|o| o.handle.addr() == who)
            .map(|o| o.name.clone())
            .ok_or(MudFault::NotThere)
    }
}
