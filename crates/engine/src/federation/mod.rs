//! Cross-server linking: the naming-service client seam and the RPC
//! clients used to reach peer servers.
//!
//! A federated exit stores only a deferred descriptor (host, world,
//! place); everything here exists to turn that descriptor into a live
//! reference at use time, and to carry occupant handles across the
//! server boundary.

pub mod naming;
pub mod peer;

use std::sync::Arc;

use mudlink_domain::{registry_key, PersonAddr};

use crate::error::TransportError;
use crate::world::person::SharedPerson;

pub use naming::{HttpNaming, Naming, StaticNaming};
pub use peer::{PeerClient, RemotePerson, RemotePlace, RemoteServer};

/// The engine's window onto other servers: naming resolution plus the
/// shared peer RPC client.
pub struct Federation {
    naming: Arc<dyn Naming>,
    peer: Arc<PeerClient>,
}

impl Federation {
    pub fn new(naming: Arc<dyn Naming>, peer: Arc<PeerClient>) -> Self {
        Self { naming, peer }
    }

    pub fn naming(&self) -> &Arc<dyn Naming> {
        &self.naming
    }

    /// Resolve `host`/`world` through the naming collaborator to a live
    /// server reference. Resolution happens on every call, never cached:
    /// the foreign process may restart and invalidate anything older.
    pub async fn lookup_server(
        &self,
        host: &str,
        world: &str,
    ) -> Result<RemoteServer, TransportError> {
        let addr = self.naming.resolve(host, &registry_key(world)).await?;
        Ok(RemoteServer::new(Arc::clone(&self.peer), addr))
    }

    /// Wrap a foreign occupant address in a deliverable handle.
    pub fn remote_person(&self, addr: PersonAddr) -> SharedPerson {
        Arc::new(RemotePerson::new(Arc::clone(&self.peer), addr))
    }
}
