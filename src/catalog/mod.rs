// Catalog module — single point of truth for the media lists.
// Owns the database connection and the in-memory per-variant lists the
// list/export features read from; the lists are mutated only through
// load/save/delete.

pub mod keywords;

#[cfg(test)]
mod tests;

use rusqlite::Connection;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::db::{self, schema};
use crate::db::schema::{Lookup, MediaRow, MovieRow};
use crate::error::{MediaLibError, Result};

/// The four media kinds. The discriminants are an external contract
/// (CSV import column 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Comic = 1,
    Book = 2,
    Movie = 3,
    Music = 4,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::Comic,
        MediaType::Book,
        MediaType::Movie,
        MediaType::Music,
    ];

    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn from_id(id: i64) -> Option<MediaType> {
        match id {
            1 => Some(MediaType::Comic),
            2 => Some(MediaType::Book),
            3 => Some(MediaType::Movie),
            4 => Some(MediaType::Music),
            _ => None,
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            MediaType::Comic => "comic",
            MediaType::Book => "book",
            MediaType::Movie => "movie",
            MediaType::Music => "music",
        }
    }

    /// Keyword rows are scoped by these ids (seeded in the keyword_type table).
    pub fn keyword_type_id(self) -> i64 {
        match self {
            MediaType::Book => 1,
            MediaType::Comic => 2,
            MediaType::Movie => 3,
            MediaType::Music => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MediaType::Comic => "Comic",
            MediaType::Book => "Book",
            MediaType::Movie => "Movie",
            MediaType::Music => "Music",
        }
    }

    /// Report label. Music entries are labelled as CDs.
    pub fn label(self) -> &'static str {
        match self {
            MediaType::Music => "CD",
            other => other.name(),
        }
    }

    pub fn label_plural(self) -> &'static str {
        match self {
            MediaType::Comic => "Comics",
            MediaType::Book => "Books",
            MediaType::Movie => "Movies",
            MediaType::Music => "CDs",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "comic" => Ok(MediaType::Comic),
            "book" => Ok(MediaType::Book),
            "movie" => Ok(MediaType::Movie),
            "music" => Ok(MediaType::Music),
            other => Err(format!(
                "unknown media type '{}' (expected comic, book, movie or music)",
                other
            )),
        }
    }
}

/// A catalog entry tagged with its variant shape. Comic, book and music share
/// the plain row; movies carry the medium type / distributor foreign keys.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    Comic(MediaRow),
    Book(MediaRow),
    Movie(MovieRow),
    Music(MediaRow),
}

/// Per-variant accessors the generic save/delete routine needs. Implemented
/// by both row shapes so the four variants share one code path.
pub trait CatalogRecord: Clone + PartialEq {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn keywords(&self) -> &str;
    fn set_keywords(&mut self, keywords: String);
    fn stamp_created(&mut self, now: &str);
    fn stamp_modified(&mut self, now: &str);
    /// Compares only the persisted columns; transient display fields and the
    /// keyword string do not count as a row change.
    fn same_stored_content(&self, stored: &Self) -> bool;
    fn fetch(conn: &Connection, table: &str, id: i64) -> Result<Option<Self>>;
    fn insert(&self, conn: &Connection, table: &str) -> Result<i64>;
    fn update(&self, conn: &Connection, table: &str) -> Result<()>;
}

impl CatalogRecord for MediaRow {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn keywords(&self) -> &str {
        &self.keywords
    }

    fn set_keywords(&mut self, keywords: String) {
        self.keywords = keywords;
    }

    fn stamp_created(&mut self, now: &str) {
        self.created_at = now.to_string();
        self.modified_at = now.to_string();
    }

    fn stamp_modified(&mut self, now: &str) {
        self.modified_at = now.to_string();
    }

    fn same_stored_content(&self, stored: &Self) -> bool {
        self.title == stored.title && self.link == stored.link
    }

    fn fetch(conn: &Connection, table: &str, id: i64) -> Result<Option<Self>> {
        schema::get_media(conn, table, id)
    }

    fn insert(&self, conn: &Connection, table: &str) -> Result<i64> {
        schema::insert_media(conn, table, self)
    }

    fn update(&self, conn: &Connection, table: &str) -> Result<()> {
        schema::update_media(conn, table, self)
    }
}

impl CatalogRecord for MovieRow {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn keywords(&self) -> &str {
        &self.keywords
    }

    fn set_keywords(&mut self, keywords: String) {
        self.keywords = keywords;
    }

    fn stamp_created(&mut self, now: &str) {
        self.created_at = now.to_string();
        self.modified_at = now.to_string();
    }

    fn stamp_modified(&mut self, now: &str) {
        self.modified_at = now.to_string();
    }

    fn same_stored_content(&self, stored: &Self) -> bool {
        self.title == stored.title
            && self.link == stored.link
            && self.medium_type_id == stored.medium_type_id
            && self.distributor_id == stored.distributor_id
    }

    fn fetch(conn: &Connection, _table: &str, id: i64) -> Result<Option<Self>> {
        schema::get_movie(conn, id)
    }

    fn insert(&self, conn: &Connection, _table: &str) -> Result<i64> {
        schema::insert_movie(conn, self)
    }

    fn update(&self, conn: &Connection, _table: &str) -> Result<()> {
        schema::update_movie(conn, self)
    }
}

/// The catalog manager. Callers must serialize access; none of the
/// operations are reentrant-safe against concurrent use of one instance.
pub struct Catalog {
    conn: Connection,
    pub medium_types: Vec<Lookup>,
    pub distributors: Vec<Lookup>,
    pub movies: Vec<MovieRow>,
    pub comics: Vec<MediaRow>,
    pub books: Vec<MediaRow>,
    pub music: Vec<MediaRow>,
}

impl Catalog {
    /// Open the database at `db_path` (creating and migrating it if needed)
    /// and wrap it in an empty catalog. Call `load_lookups` + `load_catalog`
    /// to populate the lists.
    pub fn open(db_path: &Path) -> Result<Catalog> {
        let conn = db::open_db(db_path)?;
        Ok(Catalog::new(conn))
    }

    pub fn new(conn: Connection) -> Catalog {
        Catalog {
            conn,
            medium_types: Vec::new(),
            distributors: Vec::new(),
            movies: Vec::new(),
            comics: Vec::new(),
            books: Vec::new(),
            music: Vec::new(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Load the lookup lists (medium types, distributors).
    pub fn load_lookups(&mut self) -> Result<()> {
        self.medium_types = schema::list_lookups(&self.conn, "medium_type")?;
        self.distributors = schema::list_lookups(&self.conn, "distributor")?;
        Ok(())
    }

    /// Load all media lists, join the movie display names against the loaded
    /// lookups and rebuild every entry's keyword string.
    pub fn load_catalog(&mut self) -> Result<()> {
        self.movies = schema::list_movies(&self.conn)?;

        // Set the medium type / distributor display names. A dangling foreign
        // key renders as an empty string, not as an error.
        for movie in &mut self.movies {
            movie.medium_type = self
                .medium_types
                .iter()
                .find(|l| l.id == movie.medium_type_id)
                .map(|l| l.name.clone())
                .unwrap_or_default();
            movie.distributor = movie
                .distributor_id
                .and_then(|id| self.distributors.iter().find(|l| l.id == id))
                .map(|l| l.name.clone())
                .unwrap_or_default();
        }

        self.comics = schema::list_media(&self.conn, MediaType::Comic.table())?;
        self.books = schema::list_media(&self.conn, MediaType::Book.table())?;
        self.music = schema::list_media(&self.conn, MediaType::Music.table())?;

        apply_keywords(&self.conn, MediaType::Movie.keyword_type_id(), &mut self.movies)?;
        apply_keywords(&self.conn, MediaType::Comic.keyword_type_id(), &mut self.comics)?;
        apply_keywords(&self.conn, MediaType::Book.keyword_type_id(), &mut self.books)?;
        apply_keywords(&self.conn, MediaType::Music.keyword_type_id(), &mut self.music)?;

        Ok(())
    }

    /// Save one entry: insert when `id == 0`, otherwise update (skipping the
    /// row write when nothing persisted actually changed). Keyword
    /// reconciliation runs in both cases. Fails when the entry shape does not
    /// match `media_type`.
    pub fn save(&mut self, media_type: MediaType, entry: &mut CatalogEntry) -> Result<()> {
        let conn = &self.conn;
        match (media_type, entry) {
            (MediaType::Comic, CatalogEntry::Comic(row)) => {
                save_entry(conn, MediaType::Comic, &mut self.comics, row)
            }
            (MediaType::Book, CatalogEntry::Book(row)) => {
                save_entry(conn, MediaType::Book, &mut self.books, row)
            }
            (MediaType::Movie, CatalogEntry::Movie(row)) => {
                save_entry(conn, MediaType::Movie, &mut self.movies, row)
            }
            (MediaType::Music, CatalogEntry::Music(row)) => {
                save_entry(conn, MediaType::Music, &mut self.music, row)
            }
            _ => Err(MediaLibError::UnsupportedType(media_type.to_string())),
        }
    }

    /// Delete one entry. An unsaved entry (`id == 0`) is only removed from
    /// the in-memory list. Keyword rows owned by the entry are removed with it.
    pub fn delete(&mut self, media_type: MediaType, entry: &CatalogEntry) -> Result<()> {
        let conn = &self.conn;
        match (media_type, entry) {
            (MediaType::Comic, CatalogEntry::Comic(row)) => {
                delete_entry(conn, MediaType::Comic, &mut self.comics, row)
            }
            (MediaType::Book, CatalogEntry::Book(row)) => {
                delete_entry(conn, MediaType::Book, &mut self.books, row)
            }
            (MediaType::Movie, CatalogEntry::Movie(row)) => {
                delete_entry(conn, MediaType::Movie, &mut self.movies, row)
            }
            (MediaType::Music, CatalogEntry::Music(row)) => {
                delete_entry(conn, MediaType::Music, &mut self.music, row)
            }
            _ => Err(MediaLibError::UnsupportedType(media_type.to_string())),
        }
    }

    /// Title uniqueness for comics, books and music. The entry's own id is
    /// excluded so editing an entry does not collide with itself. Movies (and
    /// mismatched pairings) report not-unique; use `is_movie_title_unique`
    /// for movies.
    pub fn is_title_unique(&self, media_type: MediaType, entry: &CatalogEntry) -> Result<bool> {
        match (media_type, entry) {
            (MediaType::Comic, CatalogEntry::Comic(row))
            | (MediaType::Book, CatalogEntry::Book(row))
            | (MediaType::Music, CatalogEntry::Music(row)) => Ok(!schema::media_title_exists(
                &self.conn,
                media_type.table(),
                row.id,
                &row.title,
            )?),
            _ => Ok(false),
        }
    }

    /// Movie title uniqueness, scoped by medium type. Pass `id = 0` for a
    /// new entry.
    pub fn is_movie_title_unique(&self, id: i64, title: &str, medium_type_id: i64) -> Result<bool> {
        Ok(!schema::movie_title_exists(&self.conn, id, title, medium_type_id)?)
    }
}

fn save_entry<T: CatalogRecord>(
    conn: &Connection,
    media_type: MediaType,
    list: &mut Vec<T>,
    entry: &mut T,
) -> Result<()> {
    let now = db::now_timestamp();

    if entry.id() == 0 {
        entry.stamp_created(&now);
        let id = entry.insert(conn, media_type.table())?;
        entry.set_id(id);
        list.push(entry.clone());
    } else {
        let stored = T::fetch(conn, media_type.table(), entry.id())?;
        let unchanged = stored
            .as_ref()
            .is_some_and(|s| entry.same_stored_content(s));

        // Skip the row write when nothing persisted changed, so the modified
        // timestamp is not churned by a keyword-only edit.
        if !unchanged {
            entry.stamp_modified(&now);
            entry.update(conn, media_type.table())?;
        }

        if let Some(pos) = list.iter().position(|e| e.id() == entry.id()) {
            list[pos] = entry.clone();
        }
    }

    // Keyword reconciliation runs unconditionally, even when the row write
    // was skipped.
    keywords::reconcile(conn, media_type.keyword_type_id(), entry.id(), entry.keywords())
}

fn delete_entry<T: CatalogRecord>(
    conn: &Connection,
    media_type: MediaType,
    list: &mut Vec<T>,
    entry: &T,
) -> Result<()> {
    if entry.id() != 0 {
        schema::delete_row(conn, media_type.table(), entry.id())?;
        schema::delete_object_keywords(conn, media_type.keyword_type_id(), entry.id())?;
    }

    if entry.id() == 0 {
        if let Some(pos) = list.iter().position(|e| e == entry) {
            list.remove(pos);
        }
    } else {
        list.retain(|e| e.id() != entry.id());
    }

    Ok(())
}

fn apply_keywords<T: CatalogRecord>(
    conn: &Connection,
    keyword_type_id: i64,
    list: &mut [T],
) -> Result<()> {
    let rows = schema::list_type_keywords(conn, keyword_type_id)?;
    for entry in list.iter_mut() {
        let values: Vec<&str> = rows
            .iter()
            .filter(|r| r.object_id == entry.id())
            .map(|r| r.value.as_str())
            .collect();
        entry.set_keywords(values.join(", "));
    }
    Ok(())
}
