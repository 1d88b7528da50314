//! User document store

use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use parley_shared::{ParleyError, User, UserId, UserRecord};

#[derive(Default)]
struct UserTable {
    by_id: HashMap<UserId, UserRecord>,
    /// Lowercased email -> user id
    by_email: HashMap<String, UserId>,
}

/// In-process user store
#[derive(Clone, Default)]
pub struct UserStore {
    inner: Arc<RwLock<UserTable>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user; emails are unique case-insensitively
    pub async fn create(
        &self,
        email: &str,
        full_name: &str,
        password_hash: String,
    ) -> Result<User, ParleyError> {
        let email = email.trim().to_lowercase();
        let mut table = self.inner.write().await;

        if table.by_email.contains_key(&email) {
            return Err(ParleyError::Conflict(format!("email {email}")));
        }

        let now = OffsetDateTime::now_utc();
        let record = UserRecord {
            id: UserId::new(),
            email: email.clone(),
            full_name: full_name.trim().to_string(),
            password_hash,
            profile_pic: None,
            created_at: now,
            updated_at: now,
        };
        let user = User::from(&record);

        table.by_email.insert(email, record.id);
        table.by_id.insert(record.id, record);

        tracing::info!(user_id = %user.id, total_users = table.by_id.len(), "User created");

        Ok(user)
    }

    /// Full record including the password hash, for login
    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let email = email.trim().to_lowercase();
        let table = self.inner.read().await;
        table
            .by_email
            .get(&email)
            .and_then(|id| table.by_id.get(id))
            .cloned()
    }

    pub async fn find_by_id(&self, user_id: UserId) -> Option<User> {
        let table = self.inner.read().await;
        table.by_id.get(&user_id).map(User::from)
    }

    pub async fn exists(&self, user_id: UserId) -> bool {
        self.inner.read().await.by_id.contains_key(&user_id)
    }

    pub async fn set_profile_pic(&self, user_id: UserId, url: String) -> Result<User, ParleyError> {
        let mut table = self.inner.write().await;
        let record = table
            .by_id
            .get_mut(&user_id)
            .ok_or_else(|| ParleyError::NotFound(format!("user {user_id}")))?;

        record.profile_pic = Some(url);
        record.updated_at = OffsetDateTime::now_utc();

        Ok(User::from(&*record))
    }

    /// Every user except `user_id`, oldest account first
    pub async fn list_except(&self, user_id: UserId) -> Vec<User> {
        let table = self.inner.read().await;
        let mut users: Vec<User> = table
            .by_id
            .values()
            .filter(|r| r.id != user_id)
            .map(User::from)
            .collect();
        users.sort_by_key(|u| u.created_at);
        users
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.by_id.len()
    }
}
