//! Presence registry
//!
//! Maps each online user to the one live connection that receives their
//! deliveries. A user's newest connection replaces any earlier entry, and a
//! disconnect only clears the entry it still owns.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use parley_shared::{ConnectionId, UserId};

/// Process-wide user id -> connection id mapping
///
/// Every operation takes the lock for its full duration, so register,
/// unregister, lookup and snapshot are linearizable with respect to each
/// other. The registry never owns or closes connections.
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    entries: Arc<RwLock<BTreeMap<UserId, ConnectionId>>>,
}

impl PresenceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `user_id`
    ///
    /// Returns the connection id that was replaced, if any.
    pub async fn register(&self, user_id: UserId, connection_id: ConnectionId) -> Option<ConnectionId> {
        let mut entries = self.entries.write().await;
        let replaced = entries.insert(user_id, connection_id);

        if let Some(previous) = replaced.filter(|p| *p != connection_id) {
            tracing::debug!(
                user_id = %user_id,
                previous_connection = %previous,
                connection_id = %connection_id,
                "Newer connection took over presence entry"
            );
        }

        replaced
    }

    /// Remove the entry for `user_id` if it still points at `connection_id`
    ///
    /// Unknown users and entries owned by a newer connection are left alone.
    /// Returns whether an entry was removed.
    pub async fn unregister(&self, user_id: UserId, connection_id: ConnectionId) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get(&user_id) {
            Some(current) if *current == connection_id => {
                entries.remove(&user_id);
                true
            }
            Some(current) => {
                tracing::debug!(
                    user_id = %user_id,
                    connection_id = %connection_id,
                    current_connection = %current,
                    "Ignoring stale disconnect"
                );
                false
            }
            None => false,
        }
    }

    /// Live connection for `user_id`, if online
    pub async fn lookup(&self, user_id: UserId) -> Option<ConnectionId> {
        self.entries.read().await.get(&user_id).copied()
    }

    /// All online user ids, in registry iteration order
    pub async fn snapshot(&self) -> Vec<UserId> {
        self.entries.read().await.keys().copied().collect()
    }

    /// Number of online users
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nobody is online
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
