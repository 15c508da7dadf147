// Database module

pub mod migrations;
pub mod schema;

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use anyhow::Result;

use crate::constants::{MEDIALIB_FOLDER, DB_FILENAME};

/// Open or create a database at the given path and bring it up to date.
pub fn open_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Cannot create database directory {}: {}. Check directory permissions.",
                parent.display(),
                e
            )
        })?;
    }

    let conn = Connection::open(db_path)?;

    // Enable foreign keys (must be done per connection)
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // Enable WAL mode for better concurrency
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;

    // Run migrations
    migrations::run_migrations(&conn)?;

    Ok(conn)
}

/// Current local time in the storage (and display) format.
pub fn now_timestamp() -> String {
    chrono::Local::now()
        .format(crate::constants::DATE_FORMAT)
        .to_string()
}

/// Get the default per-user database path: ~/.medialib/medialib.db
pub fn default_db_path() -> Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.home_dir().join(MEDIALIB_FOLDER).join(DB_FILENAME))
}
