//! Client seam for the external name-lookup service.
//!
//! Every host that runs world servers also runs a registry daemon on a
//! well-known port; a server publishes itself there under a namespaced
//! key (`mud.{world}`), and anyone resolves `host` + key to the server's
//! RPC address. The daemon itself is an external collaborator — only
//! this client side is implemented here.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use mudlink_domain::ServerAddr;

use crate::error::TransportError;

/// Default port of the registry daemon on each host.
pub const DEFAULT_REGISTRY_PORT: u16 = 10990;

/// Name-lookup collaborator: publish a binding on a host's registry,
/// resolve a key on some host to a server address.
#[async_trait]
pub trait Naming: Send + Sync {
    async fn publish(&self, host: &str, key: &str, addr: &ServerAddr)
        -> Result<(), TransportError>;

    async fn resolve(&self, host: &str, key: &str) -> Result<ServerAddr, TransportError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PublishBody {
    key: String,
    addr: ServerAddr,
}

/// HTTP client for the registry daemon
/// (`GET /lookup/{key}`, `POST /publish`).
pub struct HttpNaming {
    http: reqwest::Client,
    registry_port: u16,
}

impl HttpNaming {
    pub fn new(registry_port: u16, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self {
            http,
            registry_port,
        })
    }

    fn registry_url(&self, host: &str) -> String {
        format!("http://{}:{}", host, self.registry_port)
    }
}

#[async_trait]
impl Naming for HttpNaming {
    async fn publish(
        &self,
        host: &str,
        key: &str,
        addr: &ServerAddr,
    ) -> Result<(), TransportError> {
        let url = format!("{}/publish", self.registry_url(host));
        let body = PublishBody {
            key: key.to_string(),
            addr: addr.clone(),
        };
        self.http
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;
        tracing::debug!(host = %host, key = %key, addr = %addr, "published naming binding");
        Ok(())
    }

    async fn resolve(&self, host: &str, key: &str) -> Result<ServerAddr, TransportError> {
        let url = format!("{}/lookup/{}", self.registry_url(host), key);
        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;
        let addr = response
            .json::<ServerAddr>()
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
        Ok(addr)
    }
}

/// In-memory naming table for tests and single-process setups.
#[derive(Default)]
pub struct StaticNaming {
    bindings: DashMap<(String, String), ServerAddr>,
}

impl StaticNaming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a binding without going through `publish`.
    pub fn bind(&self, host: &str, key: &str, addr: ServerAddr) {
        self.bindings
            .insert((host.to_string(), key.to_string()), addr);
    }
}

#[async_trait]
impl Naming for StaticNaming {
    async fn publish(
        &self,
        host: &str,
        key: &str,
        addr: &ServerAddr,
    ) -> Result<(), TransportError> {
        self.bind(host, key, addr.clone());
        Ok(())
    }

    async fn resolve(&self, host: &str, key: &str) -> Result<ServerAddr, TransportError> {
        self.bindings
            .get(&(host.to_string(), key.to_string()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TransportError::Unreachable(format!("no binding for {key} on {host}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_naming_publish_then_resolve() {
        let naming = StaticNaming::new();
        let addr = ServerAddr::new("127.0.0.1:4000");
        naming
            .publish("mud.example.org", "mud.Nutshell", &addr)
            .await
            .expect("publish");
        let resolved = naming
            .resolve("mud.example.org", "mud.Nutshell")
            .await
            .expect("resolve");
        assert_eq!(resolved, addr);
    }

    #[tokio::test]
    async fn test_static_naming_unknown_key_is_unreachable() {
        let naming = StaticNaming::new();
        let err = naming
            .resolve("mud.example.org", "mud.Nowhere")
            .await
            .expect_err("should fail");
        assert!(matches!(err, TransportError::Unreachable(_)));
    }
}
