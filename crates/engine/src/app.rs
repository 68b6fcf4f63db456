//! Application state and composition.

use std::sync::Arc;

use mudlink_domain::PersonAddr;

use crate::api::directory::PersonDirectory;
use crate::world::person::SharedPerson;
use crate::world::server::MudServer;

/// Main application state, passed to HTTP/WebSocket handlers via Axum
/// state.
pub struct App {
    /// This world's registry and persistence.
    pub server: Arc<MudServer>,
    /// Occupants attached to this server over ws.
    pub directory: Arc<PersonDirectory>,
}

impl App {
    pub fn new(server: Arc<MudServer>, directory: Arc<PersonDirectory>) -> Self {
        Self { server, directory }
    }

    /// Turn a wire-level actor address into a deliverable handle:
    /// occupants attached here get their direct channel, everyone else
    /// gets an RPC-backed handle to their home server. A stale local id
    /// also falls through to the RPC path, where delivery fails and the
    /// usual eviction applies.
    pub fn resolve_actor(&self, who: &PersonAddr) -> SharedPerson {
        if who.server == *self.server.addr() {
            if let Some(person) = self.directory.get(&who.id) {
                return person;
            }
        }
        self.server.federation().remote_person(who.clone())
    }
}
