//! Schema setup for the SQLite backend.
//!
//! Migrations are tracked through SQLite's `user_version` pragma and embedded
//! at compile time.

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::StoreError;

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(include_str!("migrations/001_initial_schema.sql"))])
}

/// Opens (or creates) the database at `path` with the schema applied.
///
/// # Errors
/// Returns [`StoreError::Sqlite`] if the file cannot be opened, or
/// [`StoreError::Migration`] if the schema cannot be applied.
pub fn open_database(path: &str) -> Result<Connection, StoreError> {
    let mut conn = Connection::open(path)?;
    configure_and_migrate(&mut conn)?;
    tracing::debug!(path, "sqlite database opened");
    Ok(conn)
}

/// Opens a private in-memory database with the schema applied.
///
/// # Errors
/// Same as [`open_database`].
pub fn open_in_memory() -> Result<Connection, StoreError> {
    let mut conn = Connection::open_in_memory()?;
    configure_and_migrate(&mut conn)?;
    Ok(conn)
}

fn configure_and_migrate(conn: &mut Connection) -> Result<(), StoreError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    migrations()
        .to_latest(conn)
        .map_err(|e| StoreError::Migration(e.to_string()))?;
    Ok(())
}
