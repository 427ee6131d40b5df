//! Schema-version bookkeeping and table introspection
//!
//! The persisted schema version lives in a `schema_info` key/value
//! table. On open it is compared against the configured version to
//! decide whether the upgrade policy runs. Record tables themselves are
//! created lazily by the engine from each type's table definition.

use rusqlite::{Connection, Result};

use crate::record::quote_ident;

/// Create the version bookkeeping table if missing
pub fn init_version_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_info (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
}

/// Get the persisted schema version, if one was ever written
pub fn read_version(conn: &Connection) -> Result<Option<i32>> {
    let result: Result<String> = conn.query_row(
        "SELECT value FROM schema_info WHERE key = 'version'",
        [],
        |row| row.get(0),
    );

    match result {
        Ok(version_str) => Ok(version_str.parse().ok()),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Persist the schema version
pub fn write_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?1)",
        [version.to_string()],
    )?;
    Ok(())
}

/// Check whether a table exists
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1")?
        .exists([name])
}

/// Names of all user tables, including the version bookkeeping table
///
/// SQLite's own internal tables are excluded.
pub fn user_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>>>()?;
    Ok(names)
}

/// Drop every user table
///
/// This is the destructive half of drop-and-recreate migration; the
/// version table goes too, and the engine re-stamps it afterwards.
pub fn drop_all_tables(conn: &Connection) -> Result<()> {
    for name in user_tables(conn)? {
        conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(&name)))?;
    }
    Ok(())
}
