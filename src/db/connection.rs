use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use rusqlite::Connection;

/// Ensure the database file exists, create the key-value table if needed, and
/// return a live connection.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    create_tables(&conn)?;
    debug!("opened song store at {}", db_path.display());

    Ok(conn)
}

/// Create the single table the blob store needs. Split out so tests can run
/// it against an in-memory connection.
pub(crate) fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create kv_store table")?;

    Ok(())
}
