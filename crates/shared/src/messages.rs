//! WebSocket framing for interactive occupant sessions.
//!
//! A session starts with `Attach`; after the server confirms with
//! `Attached`, the client issues ordinary [`Request`]s wrapped in `Call`
//! frames and correlates replies by `id`. `Tell` frames arrive at any
//! time, in no guaranteed order relative to replies — broadcast delivery
//! is fire-and-forget on the server side.

use serde::{Deserialize, Serialize};

use mudlink_domain::PersonAddr;

use crate::requests::Request;
use crate::responses::Response;

/// Messages from an interactive client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Register this connection as an occupant handle. Must be the first
    /// frame of the session.
    Attach { name: String, description: String },
    /// Invoke one protocol operation.
    Call { id: u64, request: Request },
}

/// Messages from the server to an interactive client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The connection now owns an occupant handle; `who` is what the
    /// client passes as the actor in subsequent requests.
    Attached { who: PersonAddr },
    /// Reply to the `Call` with the matching `id`.
    Reply { id: u64, response: Response },
    /// A broadcast line delivered to this occupant.
    Tell { message: String },
    /// The frame could not be understood (bad JSON, or `Call` before
    /// `Attach`). The session continues.
    Invalid { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_frame_encoding() {
        let msg = ClientMessage::Call {
            id: 7,
            request: Request::GetMudName,
        };
        let json = serde_json::to_string(&msg).expect("serialize");
        assert!(json.contains(r#""type":"Call""#));
        assert!(json.contains(r#""id":7"#));
        assert!(json.contains(r#""type":"GetMudName""#));
    }

    #[test]
    fn test_tell_frame_round_trip() {
        let msg = ServerMessage::Tell {
            message: "Otto: hello".into(),
        };
        let json = serde_json::to_string(&msg).expect("serialize");
        let back: ServerMessage = serde_json::from_str(&json).expect("deserialize");
        match back {
            ServerMessage::Tell { message } => assert_eq!(message, "Otto: hello"),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
