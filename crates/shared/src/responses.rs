//! RPC responses, the mirror of [`crate::requests::Request`].

use serde::{Deserialize, Serialize};

use mudlink_domain::{MudFault, PersonAddr, ServerAddr};

/// Result of one RPC call.
///
/// Domain rejections travel as `Fault`; anything else here is a success
/// payload. Transport failures never appear in this enum — an
/// unreachable server simply fails the HTTP exchange. `Error` is
/// reserved for server-side non-domain failures (I/O during `Dump`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// The world's name.
    MudName { name: String },
    /// A network-addressable place reference.
    Place { address: ServerAddr, name: String },
    /// A network-addressable occupant reference.
    Person { who: PersonAddr },
    /// The owning server of a place.
    Server { address: ServerAddr, world: String },
    /// A single string payload (descriptions, place names).
    Text { value: String },
    /// A list of names (occupants, things, exits).
    Names { names: Vec<String> },
    /// Operation succeeded with nothing to return.
    Done,
    /// The callee understood and rejected the request.
    Fault { fault: MudFault },
    /// Server-side failure outside the domain taxonomy (e.g. snapshot I/O).
    Error { message: String },
}

impl Response {
    pub fn fault(fault: MudFault) -> Self {
        Self::Fault { fault }
    }

    /// True when this response is the given fault.
    pub fn is_fault(&self, expected: MudFault) -> bool {
        matches!(self, Self::Fault { fault } if *fault == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_response_encoding() {
        let resp = Response::fault(MudFault::NoSuchExit);
        let json = serde_json::to_string(&resp).expect("serialize");
        assert_eq!(json, r#"{"type":"Fault","fault":"NoSuchExit"}"#);
    }

    #[test]
    fn test_place_response_round_trip() {
        let resp = Response::Place {
            address: ServerAddr::new("127.0.0.1:4000"),
            name: "Lobby".into(),
        };
        let json = serde_json::to_string(&resp).expect("serialize");
        let back: Response = serde_json::from_str(&json).expect("deserialize");
        match back {
            Response::Place { address, name } => {
                assert_eq!(address.as_str(), "127.0.0.1:4000");
                assert_eq!(name, "Lobby");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
