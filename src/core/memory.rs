use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::core::store::{CredentialStore, NewUser, StoreError};
use crate::types::{User, Username};

/// Process-local store, used when no database is configured. Contents are
/// lost on restart.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    users: RwLock<Users>,
}

#[derive(Debug, Default)]
struct Users {
    next_id: i32,
    by_username: HashMap<Username, User>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if users.by_username.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername);
        }

        users.next_id += 1;

        let user = User {
            id: users.next_id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
        };

        users
            .by_username
            .insert(user.username.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.by_username.get(username).cloned())
    }
}
