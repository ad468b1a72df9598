//! Key-value preference store.
//!
//! Preferences are plain string keys and values with a caller-supplied
//! default on absence. Stores are injected wherever they are needed as
//! `&dyn PreferenceStore`:
//!
//! - [`MemoryStore`] for tests and one-off runs
//! - [`SqliteStore`] persisting to a SQLite file (or `:memory:`)
//!
//! Typed list, station-id and date values are layered on top by
//! [`PreferenceExt`].
//!
//! # Usage
//!
//! ```rust
//! use tid_prefs::{keys, MemoryStore, PreferenceExt, PreferenceStore};
//!
//! let prefs = MemoryStore::new();
//! prefs.put(keys::SEASON, "Summer").unwrap();
//! assert_eq!(prefs.get(keys::SEASON, "Spring").unwrap(), "Summer");
//!
//! prefs.put_list(keys::REGIONS, &["Uusimaa", "Lapland"]).unwrap();
//! assert_eq!(prefs.get_list(keys::REGIONS).unwrap(), vec!["Uusimaa", "Lapland"]);
//! ```

pub mod keys;
pub mod schema;
mod sqlite;
mod typed;

pub use sqlite::SqliteStore;
pub use typed::PreferenceExt;

use std::cell::RefCell;
use std::collections::HashMap;

/// A string key-value store. Writes are last-write-wins.
pub trait PreferenceStore {
    /// The stored value, or `default` when the key is absent.
    fn get(&self, key: &str, default: &str) -> anyhow::Result<String>;

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Preferences held in memory for the lifetime of the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str, default: &str) -> anyhow::Result<String> {
        Ok(self
            .entries
            .borrow()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
