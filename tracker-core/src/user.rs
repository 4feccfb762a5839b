use serde::{Deserialize, Serialize};

use crate::exercise::Exercise;
use crate::id::UserId;
use crate::log::LogQuery;

/// A registered user together with their exercise log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct User {
    /// Unique identifier for this user.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Globally unique name chosen at registration.
    pub username: String,
    /// Exercise entries in the order they were appended.
    pub log: Vec<Exercise>,
}

impl User {
    /// Create a user with a fresh id and an empty log.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_id(UserId::generate(), username)
    }

    /// Create a user with a caller-chosen id and an empty log.
    #[must_use]
    pub fn with_id(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            log: Vec::new(),
        }
    }

    /// The id/username projection returned by listing and registration.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }

    /// Build the log view for `query`.
    #[must_use]
    pub fn log_view(&self, query: &LogQuery) -> UserLog {
        let log = query.apply(&self.log);
        UserLog {
            id: self.id.clone(),
            username: self.username.clone(),
            count: log.len(),
            log,
        }
    }
}

/// A user's id and username without the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
}

impl UserSummary {
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self { id, username: username.into() }
    }
}

/// A user document whose log has been filtered by a [`LogQuery`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct UserLog {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    /// Matching entries, earliest first.
    pub log: Vec<Exercise>,
    /// Number of entries in `log`.
    pub count: usize,
}
