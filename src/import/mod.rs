// CSV import
// Parses a semicolon-delimited file into candidate entries and inserts the
// ones whose titles pass the variant's uniqueness check. Candidates are
// committed strictly one at a time so each check sees the rows inserted
// before it.

use std::path::Path;

use crate::catalog::{Catalog, CatalogEntry, MediaType};
use crate::constants::{CSV_DELIMITER, CSV_FIELD_COUNT};
use crate::db::schema::{MediaRow, MovieRow};
use crate::error::Result;

/// One parsed CSV line: `title;mediaTypeId;mediumTypeId;distributorId`.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub title: String,
    pub media_type_id: i64,
    pub medium_type_id: i64,
    pub distributor_id: Option<i64>,
}

/// Counts reported back to the caller after an import run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportSummary {
    pub parsed: usize,
    pub imported: usize,
    pub skipped: usize,
}

/// Import the content of a CSV file. A missing or empty path short-circuits
/// the whole import; invalid lines and duplicate titles are dropped silently.
/// The catalog is reloaded after all candidates are processed.
pub fn import_csv_file(catalog: &mut Catalog, filepath: &Path) -> Result<ImportSummary> {
    if filepath.as_os_str().is_empty() || !filepath.exists() {
        log::debug!("Import skipped, no file at {}", filepath.display());
        return Ok(ImportSummary::default());
    }

    let content = std::fs::read_to_string(filepath)?;
    let entries = parse_content(&content);

    let mut summary = ImportSummary {
        parsed: entries.len(),
        ..Default::default()
    };

    for media_type in MediaType::ALL {
        let candidates: Vec<&FileEntry> = entries
            .iter()
            .filter(|e| e.media_type_id == media_type.id())
            .collect();

        for candidate in candidates {
            let mut entry = build_entry(media_type, candidate);

            let unique = match media_type {
                MediaType::Movie => {
                    catalog.is_movie_title_unique(0, &candidate.title, candidate.medium_type_id)?
                }
                _ => catalog.is_title_unique(media_type, &entry)?,
            };

            if !unique {
                log::debug!("Skipping duplicate {} '{}'", media_type, candidate.title);
                continue;
            }

            catalog.save(media_type, &mut entry)?;
            summary.imported += 1;
        }
    }

    // Duplicates plus lines whose media type id matches no variant
    summary.skipped = summary.parsed - summary.imported;

    // Reload so display names and keyword strings are consistent
    catalog.load_catalog()?;

    Ok(summary)
}

fn build_entry(media_type: MediaType, candidate: &FileEntry) -> CatalogEntry {
    match media_type {
        MediaType::Comic => CatalogEntry::Comic(MediaRow {
            title: candidate.title.clone(),
            ..Default::default()
        }),
        MediaType::Book => CatalogEntry::Book(MediaRow {
            title: candidate.title.clone(),
            ..Default::default()
        }),
        MediaType::Music => CatalogEntry::Music(MediaRow {
            title: candidate.title.clone(),
            ..Default::default()
        }),
        MediaType::Movie => CatalogEntry::Movie(MovieRow {
            title: candidate.title.clone(),
            medium_type_id: candidate.medium_type_id,
            distributor_id: candidate.distributor_id,
            ..Default::default()
        }),
    }
}

/// Parse the file content. The first line is a header and is always skipped;
/// only lines with exactly four `;`-separated fields are accepted.
fn parse_content(content: &str) -> Vec<FileEntry> {
    let mut result = Vec::new();

    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split(CSV_DELIMITER).collect();
        if fields.len() != CSV_FIELD_COUNT {
            continue;
        }

        let distributor_id = to_int(fields[3]);
        result.push(FileEntry {
            title: fields[0].trim().to_string(),
            media_type_id: to_int(fields[1]),
            medium_type_id: to_int(fields[2]),
            distributor_id: (distributor_id != 0).then_some(distributor_id),
        });
    }

    result
}

/// Lenient integer parse: anything non-numeric maps to 0.
fn to_int(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}
