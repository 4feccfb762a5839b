use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Random bytes taken from a v4 UUID per short id (8 base64 characters).
const SHORT_ID_BYTES: usize = 6;

/// Generates a short URL-safe identifier such as `"k3J_x9aQ"`.
#[must_use]
pub fn short_id() -> String {
    let uuid = Uuid::new_v4();
    URL_SAFE_NO_PAD.encode(&uuid.as_bytes()[..SHORT_ID_BYTES])
}

/// Identifies a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub struct UserId(pub String);

impl UserId {
    /// Creates a new random `UserId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(short_id())
    }

    /// Creates a `UserId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifies a single entry in a user's log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub struct ExerciseId(pub String);

impl ExerciseId {
    /// Creates a new random `ExerciseId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(short_id())
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
