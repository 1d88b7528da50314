//! Connection lifecycle handling
//!
//! Turns socket open/close into presence registry updates and broadcasts the
//! online-user set to every client whenever it changes.

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

use parley_shared::{ConnectionId, UserId};

use super::{
    connection::Connection, events::ServerEvent, presence::PresenceRegistry, state::WebSocketState,
};

/// Handshake parameters from the upgrade request query string
#[derive(Debug, Default, Deserialize)]
pub struct Handshake {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl Handshake {
    /// The claimed user identity, if present and well-formed
    ///
    /// Identity is optional metadata here, not an auth gate.
    pub fn identity(&self) -> Option<UserId> {
        let raw = self.user_id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        match raw.parse() {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                tracing::debug!(user_id = %raw, error = %e, "Ignoring malformed handshake identity");
                None
            }
        }
    }
}

/// Where a connection is in its presence lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Handshake received, identity not yet established
    ///
    /// Only held inside [`PresenceHandler::on_connect`]; a returned session is
    /// always `Active` or `Anonymous`.
    Pending,
    /// No usable identity; receives broadcasts but is never registered
    Anonymous,
    /// Registered in the presence registry as this user
    Active(UserId),
    /// Terminal
    Closed,
}

/// One connection's presence state, owned by its socket task
#[derive(Debug)]
pub struct PresenceSession {
    connection: Arc<Connection>,
    phase: SessionPhase,
}

impl PresenceSession {
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }
}

/// Handles connect and disconnect events for the presence layer
#[derive(Clone)]
pub struct PresenceHandler {
    registry: PresenceRegistry,
    ws_state: WebSocketState,
}

impl PresenceHandler {
    pub fn new(registry: PresenceRegistry, ws_state: WebSocketState) -> Self {
        Self { registry, ws_state }
    }

    /// A socket was accepted
    ///
    /// Never rejects the connection. A connection with an identity becomes
    /// active and every client receives the new online-user set; an anonymous
    /// one only receives the current set itself.
    pub async fn on_connect(
        &self,
        handshake: &Handshake,
        sender: mpsc::UnboundedSender<ServerEvent>,
    ) -> PresenceSession {
        let user_id = handshake.identity();
        let connection = self
            .ws_state
            .add_connection(Connection::new(user_id, sender))
            .await;
        let mut session = PresenceSession {
            connection,
            phase: SessionPhase::Pending,
        };
        let connection_id = session.connection_id();

        let _ = session.connection.send(ServerEvent::Connected { connection_id });

        match user_id {
            Some(user_id) => {
                self.registry.register(user_id, connection_id).await;
                session.phase = SessionPhase::Active(user_id);

                tracing::info!(
                    user_id = %user_id,
                    connection_id = %connection_id,
                    "User came online"
                );

                self.broadcast_online_users().await;
            }
            None => {
                session.phase = SessionPhase::Anonymous;

                let online = self.registry.snapshot().await;
                let _ = session.connection.send(ServerEvent::GetOnlineUsers(online));
            }
        }

        session
    }

    /// A socket closed, from either side
    ///
    /// Returns whether the online-user set changed. Calling it again for a
    /// closed session does nothing.
    pub async fn on_disconnect(&self, session: &mut PresenceSession) -> bool {
        let connection_id = session.connection_id();
        let phase = std::mem::replace(&mut session.phase, SessionPhase::Closed);

        if phase == SessionPhase::Closed {
            return false;
        }

        self.ws_state.remove_connection(&connection_id).await;

        let SessionPhase::Active(user_id) = phase else {
            return false;
        };

        // Only clears the entry if this connection still owns it
        let removed = self.registry.unregister(user_id, connection_id).await;
        if removed {
            tracing::info!(
                user_id = %user_id,
                connection_id = %connection_id,
                "User went offline"
            );
            self.broadcast_online_users().await;
        }

        removed
    }

    /// Send the current online-user set to every connection
    pub async fn broadcast_online_users(&self) -> usize {
        let online = self.registry.snapshot().await;
        self.ws_state.broadcast(ServerEvent::GetOnlineUsers(online)).await
    }
}
