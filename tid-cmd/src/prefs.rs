//! The `prefs` subcommand.

use crate::output::Output;
use clap::Subcommand;
use serde::Serialize;
use tid_prefs::{PreferenceStore, SqliteStore};

#[derive(Subcommand, Debug)]
pub enum PrefsAction {
    /// Print every saved preference
    List,
    /// Print one preference
    Get {
        key: String,
        /// Printed when the key is not set
        #[arg(long, default_value = "")]
        default: String,
    },
    /// Save one preference
    Set { key: String, value: String },
    /// Forget one preference
    Clear { key: String },
}

#[derive(Debug, Serialize)]
struct Entry {
    key: String,
    value: String,
}

pub fn run_prefs(store: &SqliteStore, action: PrefsAction, output: &Output) -> anyhow::Result<()> {
    match action {
        PrefsAction::List => {
            let entries: Vec<Entry> = store
                .entries()?
                .into_iter()
                .map(|(key, value)| Entry { key, value })
                .collect();
            output.write(&entries)
        }
        PrefsAction::Get { key, default } => {
            let value = store.get(&key, &default)?;
            output.write(&[Entry { key, value }])
        }
        PrefsAction::Set { key, value } => store.put(&key, &value),
        PrefsAction::Clear { key } => store.remove(&key),
    }
}
