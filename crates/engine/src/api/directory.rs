//! Directory of occupants attached to this server.
//!
//! Each ws session owns one `LocalPerson`; broadcasts reach it through
//! the channel registered here, and peer servers reach it through the
//! `Tell`/`GetPersonDescription` RPC ops. Detaching drops the entry, so
//! later deliveries fail and the broadcasting place evicts the occupant.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use mudlink_domain::{PersonAddr, PersonId, ServerAddr};

use crate::error::TransportError;
use crate::world::person::PersonHandle;

/// An occupant whose client is connected to this server.
pub struct LocalPerson {
    addr: PersonAddr,
    name: String,
    description: String,
    sender: mpsc::Sender<String>,
}

impl LocalPerson {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl PersonHandle for LocalPerson {
    fn addr(&self) -> &PersonAddr {
        &self.addr
    }

    async fn tell(&self, message: &str) -> Result<(), TransportError> {
        self.sender
            .send(message.to_string())
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }

    async fn description(&self) -> Result<String, TransportError> {
        Ok(self.description.clone())
    }
}

/// All occupants currently attached to this server.
pub struct PersonDirectory {
    server_addr: ServerAddr,
    persons: DashMap<PersonId, Arc<LocalPerson>>,
}

impl PersonDirectory {
    pub fn new(server_addr: ServerAddr) -> Self {
        Self {
            server_addr,
            persons: DashMap::new(),
        }
    }

    /// Register a new occupant handle. `sender` is where broadcast lines
    /// for this occupant go; the ws session drains it.
    pub fn attach(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        sender: mpsc::Sender<String>,
    ) -> Arc<LocalPerson> {
        let id = PersonId::new();
        let person = Arc::new(LocalPerson {
            addr: PersonAddr::new(self.server_addr.clone(), id),
            name: name.into(),
            description: description.into(),
            sender,
        });
        self.persons.insert(id, Arc::clone(&person));
        tracing::debug!(person = %person.addr, name = %person.name, "occupant attached");
        person
    }

    /// Drop an occupant handle. Safe to call twice.
    pub fn detach(&self, id: &PersonId) {
        if self.persons.remove(id).is_some() {
            tracing::debug!(person = %id, "occupant detached");
        }
    }

    pub fn get(&self, id: &PersonId) -> Option<Arc<LocalPerson>> {
        self.persons.get(id).map(|entry| Arc::clone(entry.value()))
    }
}
