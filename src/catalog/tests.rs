// Catalog manager tests

use super::*;
use crate::db::schema::{MediaRow, MovieRow};

/// Set up an in-memory DB with all migrations applied (lookups seeded) and
/// wrap it in a catalog with loaded lookups.
fn setup_catalog() -> Catalog {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::migrations::run_migrations(&conn).unwrap();

    let mut catalog = Catalog::new(conn);
    catalog.load_lookups().unwrap();
    catalog
}

fn new_comic(title: &str) -> CatalogEntry {
    CatalogEntry::Comic(MediaRow {
        title: title.to_string(),
        ..Default::default()
    })
}

fn new_movie(title: &str, medium_type_id: i64) -> CatalogEntry {
    CatalogEntry::Movie(MovieRow {
        title: title.to_string(),
        medium_type_id,
        ..Default::default()
    })
}

fn set_modified_sentinel(catalog: &Catalog, table: &str, id: i64) {
    catalog
        .connection()
        .execute(
            &format!("UPDATE {} SET modified_at = '2000-01-01 00:00:00' WHERE id = ?1", table),
            rusqlite::params![id],
        )
        .unwrap();
}

fn stored_modified_at(catalog: &Catalog, table: &str, id: i64) -> String {
    catalog
        .connection()
        .query_row(
            &format!("SELECT modified_at FROM {} WHERE id = ?1", table),
            rusqlite::params![id],
            |row| row.get(0),
        )
        .unwrap()
}

// ---------------------------------------------------------------
// Save
// ---------------------------------------------------------------

#[test]
fn save_new_entry_assigns_id_and_appends() {
    let mut catalog = setup_catalog();

    let mut entry = new_comic("Watchmen");
    catalog.save(MediaType::Comic, &mut entry).unwrap();

    let CatalogEntry::Comic(row) = &entry else { panic!("shape changed") };
    assert!(row.id > 0, "insert must assign a positive id");
    assert!(!row.created_at.is_empty());
    assert_eq!(row.created_at, row.modified_at);

    assert_eq!(catalog.comics.len(), 1);
    assert_eq!(catalog.comics[0].id, row.id);
    assert_eq!(catalog.comics[0].title, "Watchmen");
}

#[test]
fn save_existing_entry_updates_in_place() {
    let mut catalog = setup_catalog();

    let mut entry = new_comic("Watchmen");
    catalog.save(MediaType::Comic, &mut entry).unwrap();
    let CatalogEntry::Comic(row) = entry else { panic!() };
    let id = row.id;
    set_modified_sentinel(&catalog, "comic", id);

    let mut changed = CatalogEntry::Comic(MediaRow {
        link: "https://example.org/watchmen".to_string(),
        ..row
    });
    catalog.save(MediaType::Comic, &mut changed).unwrap();

    let CatalogEntry::Comic(row) = changed else { panic!() };
    assert_eq!(row.id, id, "update must preserve the id");
    assert_eq!(catalog.comics.len(), 1, "update must not append");
    assert_eq!(catalog.comics[0].link, "https://example.org/watchmen");
    assert_ne!(
        stored_modified_at(&catalog, "comic", id),
        "2000-01-01 00:00:00",
        "a real change must refresh modified_at"
    );
}

#[test]
fn save_unchanged_entry_skips_row_write() {
    let mut catalog = setup_catalog();

    let mut entry = new_comic("Watchmen");
    catalog.save(MediaType::Comic, &mut entry).unwrap();
    let CatalogEntry::Comic(row) = entry else { panic!() };
    set_modified_sentinel(&catalog, "comic", row.id);

    let mut unchanged = CatalogEntry::Comic(row.clone());
    catalog.save(MediaType::Comic, &mut unchanged).unwrap();

    assert_eq!(
        stored_modified_at(&catalog, "comic", row.id),
        "2000-01-01 00:00:00",
        "an unchanged save must not churn modified_at"
    );
}

#[test]
fn keyword_only_change_reconciles_without_row_write() {
    let mut catalog = setup_catalog();

    let mut entry = new_comic("Watchmen");
    catalog.save(MediaType::Comic, &mut entry).unwrap();
    let CatalogEntry::Comic(row) = entry else { panic!() };
    set_modified_sentinel(&catalog, "comic", row.id);

    let mut keyword_edit = CatalogEntry::Comic(MediaRow {
        keywords: "hero, noir".to_string(),
        ..row.clone()
    });
    catalog.save(MediaType::Comic, &mut keyword_edit).unwrap();

    // Base row untouched, keyword rows converged anyway
    assert_eq!(stored_modified_at(&catalog, "comic", row.id), "2000-01-01 00:00:00");
    let rows = schema::list_object_keywords(
        catalog.connection(),
        MediaType::Comic.keyword_type_id(),
        row.id,
    )
    .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn save_rejects_mismatched_pairing() {
    let mut catalog = setup_catalog();

    let mut entry = new_comic("Watchmen");
    let err = catalog.save(MediaType::Movie, &mut entry).unwrap_err();
    assert!(matches!(err, MediaLibError::UnsupportedType(_)));
    assert!(catalog.movies.is_empty());
    assert!(catalog.comics.is_empty());
}

#[test]
fn save_movie_stores_foreign_keys() {
    let mut catalog = setup_catalog();

    let mut entry = CatalogEntry::Movie(MovieRow {
        title: "Dune".to_string(),
        medium_type_id: 1,
        distributor_id: Some(2),
        ..Default::default()
    });
    catalog.save(MediaType::Movie, &mut entry).unwrap();

    let CatalogEntry::Movie(row) = entry else { panic!() };
    let stored = schema::get_movie(catalog.connection(), row.id).unwrap().unwrap();
    assert_eq!(stored.medium_type_id, 1);
    assert_eq!(stored.distributor_id, Some(2));
}

// ---------------------------------------------------------------
// Delete
// ---------------------------------------------------------------

#[test]
fn delete_unsaved_entry_only_leaves_list() {
    let mut catalog = setup_catalog();

    // Two persisted entries plus one unsaved entry in the list
    let mut first = new_comic("Watchmen");
    catalog.save(MediaType::Comic, &mut first).unwrap();
    let unsaved = MediaRow {
        title: "Draft".to_string(),
        ..Default::default()
    };
    catalog.comics.push(unsaved.clone());
    assert_eq!(catalog.comics.len(), 2);

    catalog.delete(MediaType::Comic, &CatalogEntry::Comic(unsaved)).unwrap();

    assert_eq!(catalog.comics.len(), 1, "the unsaved entry must leave the list");
    let count: i64 = catalog
        .connection()
        .query_row("SELECT COUNT(*) FROM comic", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1, "no stored row may be touched for id 0");
}

#[test]
fn delete_removes_row_and_own_keywords() {
    let mut catalog = setup_catalog();

    let mut entry = CatalogEntry::Comic(MediaRow {
        title: "Watchmen".to_string(),
        keywords: "hero, noir".to_string(),
        ..Default::default()
    });
    catalog.save(MediaType::Comic, &mut entry).unwrap();
    let CatalogEntry::Comic(row) = entry.clone() else { panic!() };

    catalog.delete(MediaType::Comic, &entry).unwrap();

    assert!(catalog.comics.is_empty());
    let count: i64 = catalog
        .connection()
        .query_row("SELECT COUNT(*) FROM comic", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
    let keywords = schema::list_object_keywords(
        catalog.connection(),
        MediaType::Comic.keyword_type_id(),
        row.id,
    )
    .unwrap();
    assert!(keywords.is_empty());
}

#[test]
fn delete_keeps_sibling_keywords() {
    let mut catalog = setup_catalog();

    let mut doomed = CatalogEntry::Comic(MediaRow {
        title: "Watchmen".to_string(),
        keywords: "hero".to_string(),
        ..Default::default()
    });
    let mut sibling = CatalogEntry::Comic(MediaRow {
        title: "Maus".to_string(),
        keywords: "history".to_string(),
        ..Default::default()
    });
    catalog.save(MediaType::Comic, &mut doomed).unwrap();
    catalog.save(MediaType::Comic, &mut sibling).unwrap();

    catalog.delete(MediaType::Comic, &doomed).unwrap();

    // Deletion is scoped to the entry's own keyword rows; other entries of
    // the same variant keep theirs.
    let CatalogEntry::Comic(sibling_row) = sibling else { panic!() };
    let rows = schema::list_object_keywords(
        catalog.connection(),
        MediaType::Comic.keyword_type_id(),
        sibling_row.id,
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, "history");
}

#[test]
fn delete_rejects_mismatched_pairing() {
    let mut catalog = setup_catalog();

    let entry = new_comic("Watchmen");
    let err = catalog.delete(MediaType::Music, &entry).unwrap_err();
    assert!(matches!(err, MediaLibError::UnsupportedType(_)));
}

// ---------------------------------------------------------------
// Uniqueness
// ---------------------------------------------------------------

#[test]
fn title_unique_excludes_own_id() {
    let mut catalog = setup_catalog();

    let mut entry = new_comic("Watchmen");
    catalog.save(MediaType::Comic, &mut entry).unwrap();

    // Editing the same entry must not collide with itself
    assert!(catalog.is_title_unique(MediaType::Comic, &entry).unwrap());

    // A second entry with the same title is not unique
    let duplicate = new_comic("Watchmen");
    assert!(!catalog.is_title_unique(MediaType::Comic, &duplicate).unwrap());

    // A fresh title is
    let fresh = new_comic("Maus");
    assert!(catalog.is_title_unique(MediaType::Comic, &fresh).unwrap());
}

#[test]
fn title_unique_is_scoped_per_variant() {
    let mut catalog = setup_catalog();

    let mut comic = new_comic("Dune");
    catalog.save(MediaType::Comic, &mut comic).unwrap();

    // Same title under another variant does not collide
    let book = CatalogEntry::Book(MediaRow {
        title: "Dune".to_string(),
        ..Default::default()
    });
    assert!(catalog.is_title_unique(MediaType::Book, &book).unwrap());
}

#[test]
fn title_unique_reports_false_for_movies_and_mismatches() {
    let catalog = setup_catalog();

    let movie = new_movie("Dune", 1);
    assert!(!catalog.is_title_unique(MediaType::Movie, &movie).unwrap());

    let mismatch = new_comic("Dune");
    assert!(!catalog.is_title_unique(MediaType::Movie, &mismatch).unwrap());
}

#[test]
fn movie_title_unique_scoped_by_medium_type() {
    let mut catalog = setup_catalog();

    let mut movie = new_movie("Dune", 1);
    catalog.save(MediaType::Movie, &mut movie).unwrap();
    let CatalogEntry::Movie(row) = movie else { panic!() };

    // Same title + same medium type: taken
    assert!(!catalog.is_movie_title_unique(0, "Dune", 1).unwrap());
    // Same title, different medium type: free
    assert!(catalog.is_movie_title_unique(0, "Dune", 2).unwrap());
    // The entry itself is excluded when editing
    assert!(catalog.is_movie_title_unique(row.id, "Dune", 1).unwrap());
}

// ---------------------------------------------------------------
// Load
// ---------------------------------------------------------------

#[test]
fn load_catalog_joins_movie_display_names() {
    let mut catalog = setup_catalog();

    let mut movie = CatalogEntry::Movie(MovieRow {
        title: "Dune".to_string(),
        medium_type_id: 1,
        distributor_id: Some(2),
        ..Default::default()
    });
    catalog.save(MediaType::Movie, &mut movie).unwrap();

    catalog.load_catalog().unwrap();

    assert_eq!(catalog.movies.len(), 1);
    assert_eq!(catalog.movies[0].medium_type, "DVD");
    assert_eq!(catalog.movies[0].distributor, "Netflix");
}

#[test]
fn load_catalog_tolerates_dangling_lookup_ids() {
    let mut catalog = setup_catalog();

    // The bundled SQLite enforces foreign keys by default; disable them so we
    // can seed the dangling lookup ids this test is about.
    catalog
        .connection()
        .execute_batch("PRAGMA foreign_keys = OFF;")
        .unwrap();
    catalog
        .connection()
        .execute(
            "INSERT INTO movie (title, medium_type_id, distributor_id) VALUES ('Lost', 999, 999)",
            [],
        )
        .unwrap();

    catalog.load_catalog().unwrap();

    assert_eq!(catalog.movies.len(), 1);
    assert_eq!(catalog.movies[0].medium_type, "");
    assert_eq!(catalog.movies[0].distributor, "");
}

#[test]
fn load_catalog_rebuilds_keyword_strings() {
    let mut catalog = setup_catalog();

    let mut entry = CatalogEntry::Music(MediaRow {
        title: "Abbey Road".to_string(),
        keywords: " rock , pop , rock ".to_string(),
        ..Default::default()
    });
    catalog.save(MediaType::Music, &mut entry).unwrap();

    catalog.load_catalog().unwrap();

    // The reloaded string is the normalized token list joined by ", "
    assert_eq!(catalog.music.len(), 1);
    assert_eq!(catalog.music[0].keywords, "rock, pop");

    // An entry without keyword rows keeps an empty string
    let mut plain = new_comic("Watchmen");
    catalog.save(MediaType::Comic, &mut plain).unwrap();
    catalog.load_catalog().unwrap();
    assert_eq!(catalog.comics[0].keywords, "");
}
