//! WebSocket sessions for interactive occupants.
//!
//! A session attaches one occupant handle, then multiplexes request
//! replies and asynchronous `Tell` pushes over the same connection.
//! Requests run serially per session (the client correlates by id);
//! broadcasts from places arrive through the directory channel and are
//! forwarded as they come, in no particular order relative to replies.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use mudlink_shared::{ClientMessage, ServerMessage};

use crate::api::directory::LocalPerson;
use crate::api::rpc;
use crate::app::App;
use crate::world::person::PersonHandle;

pub async fn ws_handler(ws: WebSocketUpgrade, State(app): State<Arc<App>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(app, socket))
}

async fn handle_socket(app: Arc<App>, socket: WebSocket) {
    let (ws_tx, mut ws_rx) = socket.split();

    // Everything outbound funnels through one writer task.
    let (out_tx, out_rx) = mpsc::channel::<ServerMessage>(64);
    tokio::spawn(write_loop(ws_tx, out_rx));

    // The first meaningful frame must be Attach.
    let person = loop {
        let Some(Ok(frame)) = ws_rx.next().await else {
            return;
        };
        let Message::Text(text) = frame else {
            continue;
        };
        match serde_json::from_str::<ClientMessage>(text.as_str()) {
            Ok(ClientMessage::Attach { name, description }) => {
                break attach(&app, &out_tx, name, description).await;
            }
            Ok(_) => {
                let _ = out_tx
                    .send(ServerMessage::Invalid {
                        reason: "expected Attach".to_string(),
                    })
                    .await;
            }
            Err(e) => {
                let _ = out_tx
                    .send(ServerMessage::Invalid {
                        reason: e.to_string(),
                    })
                    .await;
            }
        }
    };

    let _ = out_tx
        .send(ServerMessage::Attached {
            who: person.addr().clone(),
        })
        .await;

    while let Some(Ok(frame)) = ws_rx.next().await {
        let Message::Text(text) = frame else {
            continue;
        };
        let message = match serde_json::from_str::<ClientMessage>(text.as_str()) {
            Ok(message) => message,
            Err(e) => {
                let _ = out_tx
                    .send(ServerMessage::Invalid {
                        reason: e.to_string(),
                    })
                    .await;
                continue;
            }
        };
        match message {
            ClientMessage::Call { id, request } => {
                let response = rpc::dispatch(&app, request).await;
                if out_tx
                    .send(ServerMessage::Reply { id, response })
                    .await
                    .is_err()
                {
                    break;
                }
            }
            ClientMessage::Attach { .. } => {
                let _ = out_tx
                    .send(ServerMessage::Invalid {
                        reason: "already attached".to_string(),
                    })
                    .await;
            }
        }
    }

    // Dropping the directory entry is all the cleanup there is: the next
    // broadcast that fails to reach this occupant evicts them from
    // whatever place they were in.
    app.directory.detach(&person.addr().id);
}

/// Register the occupant handle and start pumping its broadcast lines
/// into the session.
async fn attach(
    app: &App,
    out_tx: &mpsc::Sender<ServerMessage>,
    name: String,
    description: String,
) -> Arc<LocalPerson> {
    let (tell_tx, mut tell_rx) = mpsc::channel::<String>(64);
    let person = app.directory.attach(name, description, tell_tx);
    let out_tx = out_tx.clone();
    tokio::spawn(async move {
        while let Some(message) = tell_rx.recv().await {
            if out_tx.send(ServerMessage::Tell { message }).await.is_err() {
                break;
            }
        }
    });
    person
}

async fn write_loop(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut out_rx: mpsc::Receiver<ServerMessage>,
) {
    while let Some(message) = out_rx.recv().await {
        let Ok(text) = serde_json::to_string(&message) else {
            continue;
        };
        if ws_tx.send(Message::Text(text.into())).await.is_err() {
            break;
        }
    }
}
