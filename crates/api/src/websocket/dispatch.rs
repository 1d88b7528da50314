//! Best-effort real-time delivery of persisted messages

use parley_shared::{ConnectionId, Message};

use super::{events::ServerEvent, presence::PresenceRegistry, state::WebSocketState};

/// What happened to a dispatched message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Queued on the recipient's live connection
    Delivered(ConnectionId),
    /// Recipient has no live connection
    Offline,
    /// Recipient looked online but the push did not go through
    Failed(ConnectionId),
}

/// Pushes persisted messages to their recipient's live connection
#[derive(Clone)]
pub struct MessageDispatcher {
    registry: PresenceRegistry,
    ws_state: WebSocketState,
}

impl MessageDispatcher {
    pub fn new(registry: PresenceRegistry, ws_state: WebSocketState) -> Self {
        Self { registry, ws_state }
    }

    /// Push `message` to its receiver if they are online
    ///
    /// Never retries or queues. Failures are logged and returned, never raised;
    /// the message is already persisted and can be fetched later.
    pub async fn dispatch(&self, message: &Message) -> DeliveryOutcome {
        let Some(connection_id) = self.registry.lookup(message.receiver_id).await else {
            tracing::debug!(
                message_id = %message.id,
                receiver_id = %message.receiver_id,
                "Receiver offline, skipping real-time delivery"
            );
            return DeliveryOutcome::Offline;
        };

        match self
            .ws_state
            .send_to(&connection_id, ServerEvent::NewMessage(message.clone()))
            .await
        {
            Ok(()) => {
                tracing::debug!(
                    message_id = %message.id,
                    receiver_id = %message.receiver_id,
                    connection_id = %connection_id,
                    "Message pushed"
                );
                DeliveryOutcome::Delivered(connection_id)
            }
            Err(e) => {
                tracing::warn!(
                    message_id = %message.id,
                    receiver_id = %message.receiver_id,
                    error = %e,
                    "Failed to push message"
                );
                DeliveryOutcome::Failed(connection_id)
            }
        }
    }
}
