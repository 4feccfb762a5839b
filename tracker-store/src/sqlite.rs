//! SQLite implementation of [`UserStore`].
//!
//! Each user is one row holding the whole user document as JSON text. The
//! `id` and `username` columns duplicate document fields so SQLite can
//! enforce uniqueness on them. Every write runs in its own transaction.

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tokio::sync::Mutex;
use tracker_core::{Exercise, User, UserId, UserSummary};

use crate::backend::ID_ATTEMPTS;
use crate::{schema, StoreError, UserStore};

/// SQLite-backed [`UserStore`].
///
/// The connection is `!Sync`, so access is serialized through an async
/// mutex; handlers await the lock instead of blocking the runtime.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a database file at `path`.
    ///
    /// # Errors
    /// Returns [`StoreError::Sqlite`] or [`StoreError::Migration`] if the
    /// database cannot be opened or initialized.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        Ok(Self { conn: Mutex::new(schema::open_database(path)?) })
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    /// Same as [`SqliteStore::open`].
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self { conn: Mutex::new(schema::open_in_memory()?) })
    }
}

fn exists(conn: &Connection, sql: &str, value: &str) -> Result<bool, StoreError> {
    Ok(conn.query_row(sql, params![value], |row| row.get(0))?)
}

fn load_document(conn: &Connection, id: &UserId) -> Result<Option<User>, StoreError> {
    let text: Option<String> = conn
        .query_row(
            "SELECT document FROM users WHERE id = ?1",
            params![id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    text.map(|t| serde_json::from_str(&t)).transpose().map_err(Into::into)
}

/// Maps a UNIQUE violation on insert to [`StoreError::DuplicateUsername`].
fn map_insert_error(err: rusqlite::Error, username: &str) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(ref e, Some(ref msg))
            if e.code == ErrorCode::ConstraintViolation && msg.contains("users.username") =>
        {
            StoreError::DuplicateUsername(username.to_owned())
        }
        other => StoreError::Sqlite(other),
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        if exists(&tx, "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)", username)? {
            return Err(StoreError::DuplicateUsername(username.to_owned()));
        }
        let mut id = None;
        for _ in 0..ID_ATTEMPTS {
            let candidate = UserId::generate();
            let taken = exists(&tx, "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)", candidate.as_str())?;
            if !taken {
                id = Some(candidate);
                break;
            }
        }
        let id = id.ok_or(StoreError::IdExhausted { attempts: ID_ATTEMPTS })?;

        let user = User::with_id(id, username);
        let document = serde_json::to_string(&user)?;
        tx.execute(
            "INSERT INTO users (id, username, document) VALUES (?1, ?2, ?3)",
            params![user.id.as_str(), username, document],
        )
        .map_err(|e| map_insert_error(e, username))?;
        tx.commit()?;

        tracing::info!(user_id = %user.id, username, "user created");
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached("SELECT id, username FROM users ORDER BY seq")?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let username: String = row.get(1)?;
            Ok(UserSummary::new(UserId::new(id), username))
        })?;
        let users = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let conn = self.conn.lock().await;
        load_document(&conn, id)
    }

    async fn append_exercise(
        &self,
        id: &UserId,
        exercise: Exercise,
    ) -> Result<User, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let mut user =
            load_document(&tx, id)?.ok_or_else(|| StoreError::UserNotFound(id.clone()))?;
        let exercise_id = exercise.id.clone();
        user.log.push(exercise);
        let document = serde_json::to_string(&user)?;
        tx.execute(
            "UPDATE users SET document = ?1 WHERE id = ?2",
            params![document, id.as_str()],
        )?;
        tx.commit()?;

        tracing::info!(user_id = %id, %exercise_id, entries = user.log.len(), "exercise appended");
        Ok(user)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}
