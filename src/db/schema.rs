// Database schema types and query helpers
//
// The comic, book and music tables share one shape, so their helpers take the
// table name as a parameter. Table names only ever come from
// `MediaType::table()`, never from user input.

use rusqlite::{Connection, params, OptionalExtension};
use serde::{Deserialize, Serialize};
use crate::error::Result;

// ----- Lookups (medium types, distributors) -----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lookup {
    pub id: i64,
    pub name: String,
}

pub fn list_lookups(conn: &Connection, table: &str) -> Result<Vec<Lookup>> {
    let mut stmt = conn.prepare(&format!("SELECT id, name FROM {} ORDER BY id", table))?;
    let rows = stmt.query_map([], |row| {
        Ok(Lookup {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

// ----- Media rows (comic / book / music) -----

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaRow {
    pub id: i64,
    pub title: String,
    pub link: String,
    /// Comma-joined display string, rebuilt from keyword rows at load time.
    /// Never persisted in the media tables.
    pub keywords: String,
    pub created_at: String,
    pub modified_at: String,
}

fn map_media_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MediaRow> {
    Ok(MediaRow {
        id: row.get(0)?,
        title: row.get(1)?,
        link: row.get(2)?,
        keywords: String::new(),
        created_at: row.get(3)?,
        modified_at: row.get(4)?,
    })
}

pub fn list_media(conn: &Connection, table: &str) -> Result<Vec<MediaRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, title, link, created_at, modified_at FROM {} ORDER BY id",
        table
    ))?;
    let rows = stmt.query_map([], |row| map_media_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn get_media(conn: &Connection, table: &str, id: i64) -> Result<Option<MediaRow>> {
    let result = conn
        .query_row(
            &format!(
                "SELECT id, title, link, created_at, modified_at FROM {} WHERE id = ?1",
                table
            ),
            params![id],
            |row| map_media_row(row),
        )
        .optional()?;
    Ok(result)
}

pub fn insert_media(conn: &Connection, table: &str, entry: &MediaRow) -> Result<i64> {
    conn.execute(
        &format!(
            "INSERT INTO {} (title, link, created_at, modified_at) VALUES (?1, ?2, ?3, ?4)",
            table
        ),
        params![entry.title, entry.link, entry.created_at, entry.modified_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_media(conn: &Connection, table: &str, entry: &MediaRow) -> Result<()> {
    conn.execute(
        &format!(
            "UPDATE {} SET title = ?1, link = ?2, modified_at = ?3 WHERE id = ?4",
            table
        ),
        params![entry.title, entry.link, entry.modified_at, entry.id],
    )?;
    Ok(())
}

/// True when another row (excluding `id` itself) already carries the title.
/// Title comparison is case-sensitive, matching the column's default collation.
pub fn media_title_exists(conn: &Connection, table: &str, id: i64, title: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM {} WHERE (?1 = 0 OR id != ?1) AND title = ?2",
            table
        ),
        params![id, title],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn delete_row(conn: &Connection, table: &str, id: i64) -> Result<()> {
    conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), params![id])?;
    Ok(())
}

// ----- Movies -----

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRow {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub keywords: String,
    pub medium_type_id: i64,
    pub distributor_id: Option<i64>,
    /// Display name joined from the medium type lookup at load time. Derived,
    /// never persisted — the foreign key is authoritative.
    pub medium_type: String,
    /// Display name joined from the distributor lookup at load time.
    pub distributor: String,
    pub created_at: String,
    pub modified_at: String,
}

fn map_movie_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MovieRow> {
    Ok(MovieRow {
        id: row.get(0)?,
        title: row.get(1)?,
        link: row.get(2)?,
        keywords: String::new(),
        medium_type_id: row.get(3)?,
        distributor_id: row.get(4)?,
        medium_type: String::new(),
        distributor: String::new(),
        created_at: row.get(5)?,
        modified_at: row.get(6)?,
    })
}

pub fn list_movies(conn: &Connection) -> Result<Vec<MovieRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, link, medium_type_id, distributor_id, created_at, modified_at
         FROM movie ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| map_movie_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn get_movie(conn: &Connection, id: i64) -> Result<Option<MovieRow>> {
    let result = conn
        .query_row(
            "SELECT id, title, link, medium_type_id, distributor_id, created_at, modified_at
             FROM movie WHERE id = ?1",
            params![id],
            |row| map_movie_row(row),
        )
        .optional()?;
    Ok(result)
}

pub fn insert_movie(conn: &Connection, entry: &MovieRow) -> Result<i64> {
    conn.execute(
        "INSERT INTO movie (title, link, medium_type_id, distributor_id, created_at, modified_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.title,
            entry.link,
            entry.medium_type_id,
            entry.distributor_id,
            entry.created_at,
            entry.modified_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_movie(conn: &Connection, entry: &MovieRow) -> Result<()> {
    conn.execute(
        "UPDATE movie SET title = ?1, link = ?2, medium_type_id = ?3, distributor_id = ?4,
         modified_at = ?5 WHERE id = ?6",
        params![
            entry.title,
            entry.link,
            entry.medium_type_id,
            entry.distributor_id,
            entry.modified_at,
            entry.id,
        ],
    )?;
    Ok(())
}

/// Movie uniqueness is scoped by medium type: the same title may exist
/// once per medium type (e.g. DVD and Blu-ray editions).
pub fn movie_title_exists(
    conn: &Connection,
    id: i64,
    title: &str,
    medium_type_id: i64,
) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM movie
         WHERE (?1 = 0 OR id != ?1) AND medium_type_id = ?2 AND title = ?3",
        params![id, medium_type_id, title],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

// ----- Keywords -----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRow {
    pub id: i64,
    pub keyword_type_id: i64,
    pub object_id: i64,
    pub value: String,
    pub created_at: String,
}

fn map_keyword_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<KeywordRow> {
    Ok(KeywordRow {
        id: row.get(0)?,
        keyword_type_id: row.get(1)?,
        object_id: row.get(2)?,
        value: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn list_object_keywords(
    conn: &Connection,
    keyword_type_id: i64,
    object_id: i64,
) -> Result<Vec<KeywordRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, keyword_type_id, object_id, value, created_at
         FROM keyword WHERE keyword_type_id = ?1 AND object_id = ?2 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![keyword_type_id, object_id], |row| map_keyword_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn list_type_keywords(conn: &Connection, keyword_type_id: i64) -> Result<Vec<KeywordRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, keyword_type_id, object_id, value, created_at
         FROM keyword WHERE keyword_type_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![keyword_type_id], |row| map_keyword_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn insert_keyword(
    conn: &Connection,
    keyword_type_id: i64,
    object_id: i64,
    value: &str,
    created_at: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO keyword (keyword_type_id, object_id, value, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![keyword_type_id, object_id, value, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_keyword(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM keyword WHERE id = ?1", params![id])?;
    Ok(())
}

/// Remove every keyword row owned by one media entry.
pub fn delete_object_keywords(
    conn: &Connection,
    keyword_type_id: i64,
    object_id: i64,
) -> Result<()> {
    conn.execute(
        "DELETE FROM keyword WHERE keyword_type_id = ?1 AND object_id = ?2",
        params![keyword_type_id, object_id],
    )?;
    Ok(())
}

// ----- Settings -----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsRow {
    pub id: i64,
    pub key: i64,
    pub value: String,
    pub description: String,
    pub created_at: String,
    pub modified_at: String,
}

pub fn get_setting(conn: &Connection, key: i64) -> Result<Option<SettingsRow>> {
    let result = conn
        .query_row(
            "SELECT id, key, value, description, created_at, modified_at
             FROM settings WHERE key = ?1",
            params![key],
            |row| {
                Ok(SettingsRow {
                    id: row.get(0)?,
                    key: row.get(1)?,
                    value: row.get(2)?,
                    description: row.get(3)?,
                    created_at: row.get(4)?,
                    modified_at: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(result)
}

pub fn insert_setting(
    conn: &Connection,
    key: i64,
    value: &str,
    description: &str,
    now: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO settings (key, value, description, created_at, modified_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![key, value, description, now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_setting_value(conn: &Connection, key: i64, value: &str, now: &str) -> Result<()> {
    conn.execute(
        "UPDATE settings SET value = ?1, modified_at = ?2 WHERE key = ?3",
        params![value, now, key],
    )?;
    Ok(())
}
