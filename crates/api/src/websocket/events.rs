//! WebSocket event types and serialization
//!
//! Defines all client-to-server and server-to-client event types
//! with type-safe serde serialization.

use parley_shared::{ConnectionId, Message, UserId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Client-to-Server Events
// =============================================================================

/// Events sent from client to server
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Heartbeat ping to keep connection alive
    Ping,
}

// =============================================================================
// Server-to-Client Events
// =============================================================================

/// Events sent from server to client
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Connection acknowledged
    #[serde(rename_all = "camelCase")]
    Connected { connection_id: ConnectionId },

    /// Current online-user set, broadcast whenever it changes
    GetOnlineUsers(Vec<UserId>),

    /// A message addressed to this connection's user was persisted
    NewMessage(Message),

    /// Heartbeat response
    Pong,

    /// Error message
    Error { message: String },
}

impl ServerEvent {
    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connected { .. } => "connected",
            ServerEvent::GetOnlineUsers(_) => "getOnlineUsers",
            ServerEvent::NewMessage(_) => "newMessage",
            ServerEvent::Pong => "pong",
            ServerEvent::Error { .. } => "error",
        }
    }
}
