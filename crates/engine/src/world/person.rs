//! The occupant handle seam.
//!
//! A place never cares where an occupant's client actually lives; it
//! holds a `PersonHandle` and delivers lines through it. The ws layer
//! provides channel-backed local handles, the federation layer provides
//! RPC-backed handles for occupants whose home is another server.

use std::sync::Arc;

use async_trait::async_trait;

use mudlink_domain::PersonAddr;

use crate::error::TransportError;

/// Remote-callable handle to one connected user.
///
/// A failed `tell` means the connection behind the handle is dead; the
/// broadcasting place reacts by evicting the occupant. There is no
/// heartbeat — this is the only eviction mechanism.
#[async_trait]
pub trait PersonHandle: Send + Sync {
    /// Network identity used for presence equality.
    fn addr(&self) -> &PersonAddr;

    /// Deliver one line to the user behind this handle.
    async fn tell(&self, message: &str) -> Result<(), TransportError>;

    /// The user's self-description.
    async fn description(&self) -> Result<String, TransportError>;
}

pub type SharedPerson = Arc<dyn PersonHandle>;
