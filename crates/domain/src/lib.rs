//! Core domain types for the mudlink world server.
//!
//! This crate is pure data: the closed fault taxonomy, network addresses,
//! identifiers, exit destinations, and the persisted snapshot records.
//! No I/O and no async code lives here.

pub mod addr;
pub mod fault;
pub mod ids;
pub mod snapshot;

pub use addr::{registry_key, PersonAddr, ServerAddr, MUD_PREFIX};
pub use fault::MudFault;
pub use ids::PersonId;
pub use snapshot::{Destination, ExitRecord, PlaceRecord, ThingRecord, WorldSnapshot};
