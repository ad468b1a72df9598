//! SQLite-backed preference store.

use crate::schema;
use crate::PreferenceStore;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Preferences persisted in a SQLite database.
///
/// This struct is cheaply cloneable (via `Rc`); clones share the same
/// connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Rc<RefCell<Connection>>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        log::info!("Opened preference store at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }

    /// Every stored key and value, ordered by key.
    pub fn entries(&self) -> anyhow::Result<Vec<(String, String)>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare("SELECT key, value FROM preferences ORDER BY key")?;
        let rows: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl PreferenceStore for SqliteStore {
    fn get(&self, key: &str, default: &str) -> anyhow::Result<String> {
        let conn = self.conn.borrow();
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or_else(|| default.to_string()))
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        log::debug!("Saved preference {} = {}", key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
        Ok(())
    }
}
