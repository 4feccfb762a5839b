//! Error types for the store crate.

use tracker_core::UserId;

/// Errors that can occur while reading or writing user documents.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Another user already holds this username.
    #[error("User {0} already exists")]
    DuplicateUsername(String),

    /// No user document has this id.
    #[error("unknown userId {0}")]
    UserNotFound(UserId),

    /// Every freshly generated id collided with an existing one.
    #[error("could not allocate a unique user id after {attempts} attempts")]
    IdExhausted { attempts: usize },

    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying the schema failed.
    #[error("schema migration failed: {0}")]
    Migration(String),

    /// A stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
