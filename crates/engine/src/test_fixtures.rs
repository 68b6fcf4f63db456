//! Shared fixtures for unit tests: an in-process world and a scriptable
//! occupant handle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use mudlink_domain::{PersonAddr, PersonId, ServerAddr};

use crate::error::TransportError;
use crate::federation::{Federation, PeerClient, StaticNaming};
use crate::world::person::{PersonHandle, SharedPerson};
use crate::world::server::MudServer;

pub const TEST_ADDR: &str = "127.0.0.1:0";

/// Occupant handle that records everything told to it; optionally fails
/// every delivery to simulate a dead connection.
pub struct TestPerson {
    addr: PersonAddr,
    received: Mutex<Vec<String>>,
    fail_delivery: bool,
}

impl TestPerson {
    pub fn new() -> Arc<Self> {
        Self::build(false)
    }

    /// A handle whose deliveries always fail, as if the client vanished.
    pub fn unreachable() -> Arc<Self> {
        Self::build(true)
    }

    fn build(fail_delivery: bool) -> Arc<Self> {
        Arc::new(Self {
            addr: PersonAddr::new(ServerAddr::new(TEST_ADDR), PersonId::new()),
            received: Mutex::new(Vec::new()),
            fail_delivery,
        })
    }

    pub async fn received(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }

    pub fn as_person(self: &Arc<Self>) -> SharedPerson {
        Arc::clone(self) as SharedPerson
    }
}

#[async_trait]
impl PersonHandle for TestPerson {
    fn addr(&self) -> &PersonAddr {
        &self.addr
    }

    async fn tell(&self, message: &str) -> Result<(), TransportError> {
        if self.fail_delivery {
            return Err(TransportError::ChannelClosed);
        }
        self.received.lock().await.push(message.to_string());
        Ok(())
    }

    async fn description(&self) -> Result<String, TransportError> {
        Ok("a test person".to_string())
    }
}

/// Federation wired to an empty in-memory naming table: every remote
/// lookup fails, which is exactly what most unit tests want.
pub fn test_federation() -> Arc<Federation> {
    let naming = Arc::new(StaticNaming::new());
    let peer = Arc::new(PeerClient::new(Duration::from_millis(500)).expect("peer client"));
    Arc::new(Federation::new(naming, peer))
}

/// A fresh world with a "Lobby" entrance.
pub fn test_server(world: &str) -> Arc<MudServer> {
    MudServer::bootstrap(
        world,
        "hunter2",
        ServerAddr::new(TEST_ADDR),
        test_federation(),
        "Lobby",
        "A dusty lobby",
    )
    .expect("bootstrap")
}

/// Give detached broadcast tasks a moment to run.
pub async fn settle_broadcasts() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
