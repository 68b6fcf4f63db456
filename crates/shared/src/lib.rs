//! Wire protocol for the mudlink world server.
//!
//! Every remote-invocable operation — whether the caller is an
//! interactive client or a peer server resolving a federated link — is
//! one variant of [`Request`], answered by one [`Response`]. WebSocket
//! sessions wrap the same requests in [`ClientMessage`]/[`ServerMessage`]
//! so that asynchronous `Tell` pushes can share the connection.

pub mod messages;
pub mod requests;
pub mod responses;

pub use messages::{ClientMessage, ServerMessage};
pub use requests::Request;
pub use responses::Response;
