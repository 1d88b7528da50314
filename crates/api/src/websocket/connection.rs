//! WebSocket connection management
//!
//! Represents an active WebSocket connection and its outbound event channel.

use parley_shared::{ConnectionId, UserId};
use tokio::sync::mpsc;

use super::events::ServerEvent;

/// Represents an active WebSocket connection
#[derive(Debug)]
pub struct Connection {
    /// Unique ID for this connection
    pub id: ConnectionId,

    /// User identity from the handshake, if one was supplied
    pub user_id: Option<UserId>,

    /// Channel to send events to this connection
    pub sender: mpsc::UnboundedSender<ServerEvent>,
}

impl Connection {
    /// Create a new connection
    pub fn new(user_id: Option<UserId>, sender: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            id: ConnectionId::new(),
            user_id,
            sender,
        }
    }

    /// Send an event to this connection
    ///
    /// Returns Ok(()) if sent successfully, Err if connection is closed
    #[allow(clippy::result_large_err)] // Error type is from tokio mpsc, containing the failed event
    pub fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event)
    }

    /// Whether the socket task has stopped draining this connection
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
