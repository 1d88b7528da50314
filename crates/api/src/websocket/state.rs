//! Live connection table
//!
//! Tracks every open socket, registered or anonymous, and provides the two
//! push primitives the presence layer needs: one connection, or all of them.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use parley_shared::ConnectionId;

use super::connection::Connection;
use super::events::ServerEvent;

/// Global WebSocket state shared across all connections
#[derive(Clone)]
pub struct WebSocketState {
    /// All active connections indexed by connection id
    connections: Arc<RwLock<HashMap<ConnectionId, Arc<Connection>>>>,
}

/// Why a push to a single connection did not happen
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PushError {
    #[error("Connection {0} is not open")]
    UnknownConnection(ConnectionId),
    #[error("Connection {0} closed before the event was queued")]
    Closed(ConnectionId),
}

impl WebSocketState {
    /// Create new WebSocket state
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a connection
    pub async fn add_connection(&self, conn: Connection) -> Arc<Connection> {
        let conn = Arc::new(conn);
        let mut connections = self.connections.write().await;
        connections.insert(conn.id, Arc::clone(&conn));

        tracing::info!(
            connection_id = %conn.id,
            user_id = ?conn.user_id,
            total_connections = connections.len(),
            "WebSocket connection added"
        );

        conn
    }

    /// Remove a connection
    pub async fn remove_connection(&self, connection_id: &ConnectionId) -> Option<Arc<Connection>> {
        let mut connections = self.connections.write().await;
        let removed = connections.remove(connection_id);

        if let Some(conn) = &removed {
            tracing::info!(
                connection_id = %connection_id,
                user_id = ?conn.user_id,
                remaining_connections = connections.len(),
                "WebSocket connection removed"
            );
        }

        removed
    }

    /// Get a connection by ID
    pub async fn get_connection(&self, connection_id: &ConnectionId) -> Option<Arc<Connection>> {
        let connections = self.connections.read().await;
        connections.get(connection_id).cloned()
    }

    /// Get total number of active connections
    pub async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }

    /// Push an event to one connection
    pub async fn send_to(&self, connection_id: &ConnectionId, event: ServerEvent) -> Result<(), PushError> {
        let conn = self
            .get_connection(connection_id)
            .await
            .ok_or(PushError::UnknownConnection(*connection_id))?;

        conn.send(event).map_err(|_| PushError::Closed(*connection_id))
    }

    /// Broadcast an event to every open connection
    ///
    /// Skips connections whose socket task has stopped (it removes them itself).
    /// Returns the number of connections the event was queued for.
    pub async fn broadcast(&self, event: ServerEvent) -> usize {
        let connections = self.connections.read().await;
        let mut success_count = 0;
        let mut failed_count = 0;
        let mut closed_count = 0;

        for conn in connections.values() {
            if conn.is_closed() {
                closed_count += 1;
                continue;
            }

            match conn.send(event.clone()) {
                Ok(()) => success_count += 1,
                Err(_) => {
                    failed_count += 1;
                    tracing::warn!(
                        connection_id = %conn.id,
                        "Failed to send event to connection (likely closed)"
                    );
                }
            }
        }

        tracing::debug!(
            event_type = event.name(),
            recipients = success_count,
            failed = failed_count,
            closed = closed_count,
            "Broadcast event to all connections"
        );

        success_count
    }
}

impl Default for WebSocketState {
    fn default() -> Self {
        Self::new()
    }
}
