//! The closed set of domain faults a place or server can reject with.
//!
//! A fault means the callee understood the request and refused it for a
//! stated reason. Unreachability of the callee is a transport concern and
//! is represented separately (see the engine's `TransportError`); the two
//! channels never mix, except where a failed federation probe is
//! deliberately translated into `LinkFailed` or `NoSuchPlace`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain fault taxonomy. Each variant carries no payload beyond its kind.
///
/// These cross the wire inside `Response::Fault`, so the set is part of
/// the protocol contract: new variants are additive, removals are
/// breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MudFault {
    /// The acting occupant is not present in this place.
    #[error("you can't do that when you're not there")]
    NotThere,
    /// The occupant (or thing name) is already present.
    #[error("already there")]
    AlreadyThere,
    /// No thing by that name here.
    #[error("there isn't any such thing here")]
    NoSuchThing,
    /// No occupant by that name here.
    #[error("there isn't anyone by that name here")]
    NoSuchPerson,
    /// No exit by that name leads out of this place.
    #[error("there isn't an exit in that direction")]
    NoSuchExit,
    /// The named place is not registered (locally or on the probed server).
    #[error("there isn't any such place")]
    NoSuchPlace,
    /// An exit with that name already leads out of this place.
    #[error("there is already an exit in that direction")]
    ExitAlreadyExists,
    /// A place with that name is already registered in this world.
    #[error("there is already a place with that name")]
    PlaceAlreadyExists,
    /// A deferred exit could not be resolved to a live place.
    #[error("that exit is not functioning")]
    LinkFailed,
    /// The admin password gating persistence did not match.
    #[error("invalid password")]
    BadPassword,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages_are_client_renderable() {
        assert_eq!(
            MudFault::NoSuchExit.to_string(),
            "there isn't an exit in that direction"
        );
        assert_eq!(MudFault::BadPassword.to_string(), "invalid password");
    }

    #[test]
    fn test_fault_serializes_as_bare_kind() {
        let json = serde_json::to_string(&MudFault::LinkFailed).expect("serialize");
        assert_eq!(json, "\"LinkFailed\"");
        let back: MudFault = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, MudFault::LinkFailed);
    }
}
