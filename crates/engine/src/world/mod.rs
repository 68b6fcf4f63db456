//! The world graph: places, occupant handles, and the server registry.

pub mod person;
pub mod place;
pub mod server;

pub use person::{PersonHandle, SharedPerson};
pub use place::{Place, PlaceRef, Thing};
pub use server::{DumpError, MudServer};
