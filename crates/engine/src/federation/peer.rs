//! RPC clients for peer world servers.
//!
//! A peer is just another mudlink engine reached over `POST /rpc`. The
//! wrappers here speak the shared protocol and keep the fault/transport
//! distinction intact; translating transport failures into domain faults
//! is the caller's decision, made at the probe sites.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use mudlink_domain::{PersonAddr, ServerAddr};
use mudlink_shared::{Request, Response};

use crate::error::{PeerError, TransportError};
use crate::world::person::PersonHandle;

/// Shared HTTP client for all outbound peer calls. One uniform timeout
/// applies; expiry surfaces as a transport error and gets mapped to
/// `LinkFailed`/`NoSuchPlace` at the call sites that probe peers.
pub struct PeerClient {
    http: reqwest::Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { http })
    }

    /// One round trip: POST the request, decode the response.
    pub async fn call(
        &self,
        addr: &ServerAddr,
        request: &Request,
    ) -> Result<Response, TransportError> {
        let url = format!("{}/rpc", addr.base_url());
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;
        response
            .json::<Response>()
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))
    }

    /// Like `call`, but splits domain faults out of the response.
    async fn call_checked(
        &self,
        addr: &ServerAddr,
        request: &Request,
    ) -> Result<Response, PeerError> {
        match self.call(addr, request).await? {
            Response::Fault { fault } => Err(PeerError::Fault(fault)),
            Response::Error { message } => {
                Err(PeerError::Transport(TransportError::Protocol(message)))
            }
            response => Ok(response),
        }
    }
}

/// A world server on another host.
pub struct RemoteServer {
    peer: Arc<PeerClient>,
    addr: ServerAddr,
}

impl RemoteServer {
    pub fn new(peer: Arc<PeerClient>, addr: ServerAddr) -> Self {
        Self { peer, addr }
    }

    pub fn addr(&self) -> &ServerAddr {
        &self.addr
    }

    pub async fn get_mud_name(&self) -> Result<String, PeerError> {
        match self
            .peer
            .call_checked(&self.addr, &Request::GetMudName)
            .await?
        {
            Response::MudName { name } => Ok(name),
            other => Err(unexpected(other)),
        }
    }

    /// Look up a place on the peer. This is the eager probe `link_to`
    /// relies on, and the per-traversal resolution `go` relies on.
    pub async fn get_named_place(&self, name: &str) -> Result<RemotePlace, PeerError> {
        let request = Request::GetNamedPlace {
            name: name.to_string(),
        };
        match self.peer.call_checked(&self.addr, &request).await? {
            Response::Place { address, name } => Ok(RemotePlace {
                peer: Arc::clone(&self.peer),
                address,
                name,
            }),
            other => Err(unexpected(other)),
        }
    }
}

/// A place living on another server, freshly resolved for one use.
pub struct RemotePlace {
    peer: Arc<PeerClient>,
    address: ServerAddr,
    name: String,
}

impl RemotePlace {
    pub fn address(&self) -> &ServerAddr {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Put an occupant into the foreign place.
    pub async fn enter(
        &self,
        who: &PersonAddr,
        name: &str,
        message: Option<&str>,
    ) -> Result<(), PeerError> {
        let request = Request::Enter {
            place: self.name.clone(),
            who: who.clone(),
            name: name.to_string(),
            message: message.map(str::to_string),
        };
        match self.peer.call_checked(&self.address, &request).await? {
            Response::Done => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

/// Occupant handle whose home server is elsewhere: `tell` is forwarded
/// to the server that owns the connection.
pub struct RemotePerson {
    peer: Arc<PeerClient>,
    addr: PersonAddr,
}

impl RemotePerson {
    pub fn new(peer: Arc<PeerClient>, addr: PersonAddr) -> Self {
        Self { peer, addr }
    }
}

#[async_trait]
impl PersonHandle for RemotePerson {
    fn addr(&self) -> &PersonAddr {
        &self.addr
    }

    async fn tell(&self, message: &str) -> Result<(), TransportError> {
        let request = Request::Tell {
            person: self.addr.id,
            message: message.to_string(),
        };
        match self.peer.call(&self.addr.server, &request).await? {
            Response::Done => Ok(()),
            // The owning server no longer knows this occupant: the
            // connection behind the handle is gone for good.
            Response::Fault { .. } => Err(TransportError::ChannelClosed),
            other => Err(TransportError::Protocol(format!(
                "unexpected reply to Tell: {other:?}"
            ))),
        }
    }

    async fn description(&self) -> Result<String, TransportError> {
        let request = Request::GetPersonDescription {
            person: self.addr.id,
        };
        match self.peer.call(&self.addr.server, &request).await? {
            Response::Text { value } => Ok(value),
            Response::Fault { .. } => Err(TransportError::ChannelClosed),
            other => Err(TransportError::Protocol(format!(
                "unexpected reply to GetPersonDescription: {other:?}"
            ))),
        }
    }
}

fn unexpected(response: Response) -> PeerError {
    PeerError::Transport(TransportError::Protocol(format!(
        "unexpected reply: {response:?}"
    )))
}
