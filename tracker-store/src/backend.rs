//! Storage backend abstraction trait.
//!
//! Lets the gateway run against the in-memory store or SQLite without
//! changing its handlers.

use async_trait::async_trait;
use tracker_core::{Exercise, User, UserId, UserSummary};

use crate::StoreError;

/// How many fresh ids are tried before giving up on a collision streak.
pub const ID_ATTEMPTS: usize = 8;

/// Persistent collection of user documents.
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
/// Each method is atomic with respect to a single user document; nothing
/// spans more than one document.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user with an empty log.
    ///
    /// # Errors
    /// Returns [`StoreError::DuplicateUsername`] if `username` is taken.
    async fn create_user(&self, username: &str) -> Result<User, StoreError>;

    /// Every user's id and username in creation order.
    ///
    /// # Errors
    /// Returns a backend error if the collection cannot be read.
    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError>;

    /// Look up a user document by id.
    ///
    /// # Errors
    /// Returns a backend error if the lookup itself fails. A missing user is
    /// `Ok(None)`.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// Append `exercise` to the user's log and return the updated document.
    ///
    /// # Errors
    /// Returns [`StoreError::UserNotFound`] if no user has this id.
    async fn append_exercise(&self, id: &UserId, exercise: Exercise)
        -> Result<User, StoreError>;

    /// Check that the backend can serve requests.
    ///
    /// # Errors
    /// Returns the backend error that made the probe fail.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Like [`find_user`](Self::find_user) but treats absence as an error.
    ///
    /// # Errors
    /// Returns [`StoreError::UserNotFound`] if no user has this id.
    async fn get_user(&self, id: &UserId) -> Result<User, StoreError> {
        self.find_user(id)
            .await?
            .ok_or_else(|| StoreError::UserNotFound(id.clone()))
    }
}
