//! HTTP/RPC and WebSocket entry points.

pub mod directory;
pub mod rpc;
pub mod websocket;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::app::App;

pub use directory::{LocalPerson, PersonDirectory};

/// The protocol boundary: `POST /rpc` for any caller (clients and peer
/// servers alike), `GET /ws` for interactive occupant sessions.
pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/rpc", post(rpc::rpc_handler))
        .route("/ws", get(websocket::ws_handler))
        .with_state(app)
}
