//! SQL schema for the preference database.

/// Returns the full SQL schema as a single batch string.
///
/// One table, `preferences`, with the key as primary key so a write
/// replaces any earlier value.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS preferences (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    "#
}
