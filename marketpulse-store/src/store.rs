//! SQLite-backed key/value store for event buffers.

use crate::error::StoreResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Persists one serialized event buffer per event kind.
///
/// Appends grow the stored value by concatenation, so a write is O(1) in
/// the number of already-buffered events. Each mutation runs inside its
/// own transaction under the connection lock, which gives per-key
/// linearizability: two concurrent appends to the same key never lose a
/// writer's contribution.
#[derive(Clone)]
pub struct BufferStore {
    conn: Arc<Mutex<Connection>>,
}

impl BufferStore {
    /// Opens or creates a buffer store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory buffer store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Atomically transforms the value stored under `key`.
    ///
    /// `f` receives the current value (`None` if the key is absent) and
    /// returns the replacement; returning `None` deletes the key. The read
    /// and write happen in one transaction, so concurrent callers
    /// serialize rather than clobber each other.
    pub fn read_modify_write<F>(&self, key: &str, f: F) -> StoreResult<()>
    where
        F: FnOnce(Option<String>) -> Option<String>,
    {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let current: Option<String> = tx
            .query_row(
                "SELECT value FROM event_buffers WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match f(current) {
            Some(value) => {
                tx.execute(
                    "INSERT INTO event_buffers (key, value) VALUES (?, ?) \
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, value],
                )?;
            }
            None => {
                tx.execute("DELETE FROM event_buffers WHERE key = ?", params![key])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Appends a fragment to the buffer under `key`, creating the buffer
    /// on first append.
    pub fn append(&self, key: &str, fragment: &str) -> StoreResult<()> {
        self.read_modify_write(key, |current| match current {
            Some(mut value) => {
                value.push_str(fragment);
                Some(value)
            }
            None => Some(fragment.to_string()),
        })
    }

    /// Reads the raw buffer under `key`, or `None` if nothing has been
    /// appended since the last remove.
    pub fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row(
                "SELECT value FROM event_buffers WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Removes the buffer under `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        self.read_modify_write(key, |_| None)
    }
}

fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS event_buffers (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}
