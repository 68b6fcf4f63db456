//! Mudlink Engine library.
//!
//! This crate contains all server-side code for one federated world:
//!
//! - `world/` - The place graph, occupant handles, registry, persistence
//! - `federation/` - Naming-service client and peer-server RPC clients
//! - `api/` - HTTP/RPC and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod error;
pub mod federation;
pub mod world;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use app::App;
