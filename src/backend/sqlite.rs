use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{ffi, params, Connection, OptionalExtension};
use tracing::debug;

use crate::backend::BackingStore;
use crate::error::StoreError;

/// A relational store of record backed by SQLite.
///
/// Keys are unique at the schema level, so two racing creates for the same
/// key resolve to exactly one success.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at `path` and apply the schema.
    ///
    /// `:memory:` opens a private in-process database.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            // best-effort: if this fails, Connection::open will surface the error
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                key_name  TEXT    NOT NULL,
                value     TEXT    NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS kv_key_name
                ON kv(key_name);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl BackingStore for SqliteStore {
    fn create(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        match conn.execute(
            "INSERT INTO kv (key_name, value) VALUES (?1, ?2)",
            params![key, value],
        ) {
            Ok(_) => {
                debug!(key, id = conn.last_insert_rowid(), "row created");
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(key.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM kv WHERE key_name = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let removed = conn.execute("DELETE FROM kv WHERE key_name = ?1", params![key])?;
        if removed == 0 {
            return Err(StoreError::NotFound(key.to_string()));
        }
        Ok(())
    }
}
