//! WebSocket handler for Axum
//!
//! Upgrades the connection, runs the presence lifecycle around the socket and
//! routes client events.

use axum::{
    extract::{
        rejection::QueryRejection,
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use tokio::sync::mpsc;

use crate::state::AppState;

use super::{
    events::{ClientEvent, ServerEvent},
    lifecycle::{Handshake, PresenceSession},
};

/// WebSocket handler - upgrades HTTP connection to WebSocket
///
/// The `userId` query parameter is the only handshake input. Sessions were
/// authenticated by the HTTP routes that issued them. A query string that
/// does not parse still upgrades, as an anonymous connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    handshake: Result<Query<Handshake>, QueryRejection>,
) -> Response {
    let handshake = handshake_or_anonymous(handshake);
    tracing::debug!(user_id = ?handshake.user_id, "WebSocket connection upgrade requested");

    ws.on_upgrade(move |socket| handle_socket(socket, handshake, app_state))
}

/// Unwrap the handshake query, treating a malformed one as no identity
fn handshake_or_anonymous(query: Result<Query<Handshake>, QueryRejection>) -> Handshake {
    match query {
        Ok(Query(handshake)) => handshake,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Malformed handshake query, connecting anonymously");
            Handshake::default()
        }
    }
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, handshake: Handshake, app_state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for sending events to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let handler = app_state.presence_handler.clone();
    let mut session = handler.on_connect(&handshake, tx).await;
    let connection_id = session.connection_id();

    // Spawn task to send messages to client
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break; // Connection closed
                    }
                }
                Err(e) => {
                    tracing::error!(error = ?e, "Failed to serialize WebSocket event");
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, error = ?e, "WebSocket read error");
                break;
            }
        };

        match msg {
            Message::Text(text) => handle_client_text(&session, &text),
            Message::Close(_) => {
                tracing::info!(connection_id = %connection_id, "WebSocket close frame received");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => {
                // Axum handles ping/pong automatically
            }
            Message::Binary(_) => {} // Ignore binary messages
        }
    }

    // Cleanup on disconnect
    tracing::info!(connection_id = %connection_id, "WebSocket connection closing");
    handler.on_disconnect(&mut session).await;

    send_task.abort();
}

/// Parse and handle one client text frame
fn handle_client_text(session: &PresenceSession, text: &str) {
    let conn = session.connection();

    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Ping) => {
            let _ = conn.send(ServerEvent::Pong);
        }
        Err(e) => {
            tracing::warn!(
                connection_id = %conn.id,
                error = ?e,
                message = %text,
                "Failed to parse client event"
            );
            let _ = conn.send(ServerEvent::Error {
                message: "Invalid event format".to_string(),
            });
        }
    }
}
