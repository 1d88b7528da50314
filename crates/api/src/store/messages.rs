//! Message document store

use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use parley_shared::{Message, MessageId, NewMessage, UserId};

/// In-process, append-only message store
#[derive(Clone, Default)]
pub struct MessageStore {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a message and return its canonical record
    pub async fn insert(&self, new: NewMessage) -> Message {
        let message = Message {
            id: MessageId::new(),
            sender_id: new.sender_id,
            receiver_id: new.receiver_id,
            text: new.text,
            image_url: new.image_url,
            seen: false,
            created_at: OffsetDateTime::now_utc(),
        };

        let mut messages = self.messages.write().await;
        messages.push(message.clone());

        tracing::debug!(
            message_id = %message.id,
            sender_id = %message.sender_id,
            receiver_id = %message.receiver_id,
            "Message persisted"
        );

        message
    }

    /// Conversation between two users in creation order
    pub async fn conversation(&self, a: UserId, b: UserId) -> Vec<Message> {
        let messages = self.messages.read().await;
        messages
            .iter()
            .filter(|m| m.is_between(a, b))
            .cloned()
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.messages.read().await.len()
    }
}
