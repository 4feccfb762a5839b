//! Document storage for exercise tracker users.
//!
//! Defines the [`UserStore`] contract and two backends: [`MemoryStore`]
//! for tests and ephemeral runs, and [`SqliteStore`], which keeps each user
//! document as a JSON row.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod backend;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use backend::UserStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
