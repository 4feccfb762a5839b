//! In-memory user document store.
//!
//! Keeps every document in an insertion-ordered map. Nothing survives a
//! restart; used for tests and for `TRACKER_DB_PATH=:memory:`.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracker_core::{Exercise, User, UserId, UserSummary};

use crate::backend::ID_ATTEMPTS;
use crate::{StoreError, UserStore};

#[derive(Debug, Default)]
struct Documents {
    users: IndexMap<UserId, User>,
    /// username -> id
    usernames: HashMap<String, UserId>,
}

/// Thread-safe in-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<Documents>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.docs.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let mut docs = self.docs.write().await;
        if docs.usernames.contains_key(username) {
            return Err(StoreError::DuplicateUsername(username.to_owned()));
        }
        let id = (0..ID_ATTEMPTS)
            .map(|_| UserId::generate())
            .find(|id| !docs.users.contains_key(id))
            .ok_or(StoreError::IdExhausted { attempts: ID_ATTEMPTS })?;

        let user = User::with_id(id.clone(), username);
        docs.usernames.insert(username.to_owned(), id.clone());
        docs.users.insert(id, user.clone());
        tracing::info!(user_id = %user.id, username, "user created");
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        Ok(self.docs.read().await.users.values().map(User::summary).collect())
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.docs.read().await.users.get(id).cloned())
    }

    async fn append_exercise(
        &self,
        id: &UserId,
        exercise: Exercise,
    ) -> Result<User, StoreError> {
        let mut docs = self.docs.write().await;
        let user = docs
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::UserNotFound(id.clone()))?;
        tracing::info!(user_id = %id, exercise_id = %exercise.id, "exercise appended");
        user.log.push(exercise);
        Ok(user.clone())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
