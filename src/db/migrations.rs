// Database migrations
// Migrations are forward-only. Never edit or delete a migration after it ships.

use rusqlite::Connection;
use anyhow::Result;

/// All migrations in order. Each migration is a SQL string.
/// Uses PRAGMA user_version for version tracking.
const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    -- Lookup tables (read-mostly reference data)
    CREATE TABLE medium_type (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE distributor (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    CREATE TABLE keyword_type (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );

    -- Media tables, one per variant
    CREATE TABLE comic (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        link TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
        modified_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
    );

    CREATE TABLE book (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        link TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
        modified_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
    );

    CREATE TABLE music (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        link TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
        modified_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
    );

    CREATE TABLE movie (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        link TEXT NOT NULL DEFAULT '',
        medium_type_id INTEGER NOT NULL REFERENCES medium_type(id),
        distributor_id INTEGER REFERENCES distributor(id),
        created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
        modified_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
    );
    CREATE INDEX idx_movie_title ON movie(title, medium_type_id);

    -- Keywords: one row per tag, attached to a media row by (type, object)
    CREATE TABLE keyword (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        keyword_type_id INTEGER NOT NULL REFERENCES keyword_type(id),
        object_id INTEGER NOT NULL,
        value TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
    );
    CREATE INDEX idx_keyword_owner ON keyword(keyword_type_id, object_id);

    -- Settings KV (enumerated keys)
    CREATE TABLE settings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        key INTEGER NOT NULL UNIQUE,
        value TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
        modified_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
    );
    "#,

    // Migration 2: Seed reference data
    r#"
    INSERT INTO medium_type (name) VALUES
        ('DVD'), ('Blu-ray'), ('VHS'), ('Other'), ('Digital');

    INSERT INTO distributor (name) VALUES
        ('Amazon'), ('Netflix'), ('Disney+'), ('Sony (PSN)');

    INSERT INTO keyword_type (id, name) VALUES
        (1, 'Book'), (2, 'Comic'), (3, 'Movie'), (4, 'Music');
    "#,
];

/// Get current schema version
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.query_row(
        "PRAGMA user_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    let target_version = MIGRATIONS.len() as u32;

    if current_version > target_version {
        anyhow::bail!(
            "Database schema version {} is newer than this build supports (max {}). Please upgrade MediaLib.",
            current_version,
            target_version
        );
    }

    if current_version == target_version {
        return Ok(());
    }

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let migration_version = (i + 1) as u32;
        if migration_version <= current_version {
            continue;
        }

        conn.execute_batch(migration)?;
        conn.execute_batch(&format!("PRAGMA user_version = {}", migration_version))?;

        log::info!("Applied migration {}", migration_version);
    }

    Ok(())
}
