// HTML export
// Renders the in-memory catalog into a static report by substituting the
// [BODY*]/[COUNT*]/[INFOCOUNT*]/[UPDATE] placeholders of a template file.
// The rendered page is written as index.html into the target directory.

use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, MediaType};
use crate::constants::{
    ASSETS_FOLDER, DATE_FORMAT, EMPTY_BODY_TEXT, LOGO_FILENAME, OUTPUT_FILENAME,
    TEMPLATE_FILENAME, UPDATE_PLACEHOLDER,
};
use crate::db::schema::MediaRow;
use crate::error::{MediaLibError, Result};

/// Render the catalog into `target_dir/index.html` using the given template.
/// A `logo.png` next to the template is copied alongside when present.
/// Returns the path of the written report.
pub fn export_html(catalog: &Catalog, template_path: &Path, target_dir: &Path) -> Result<PathBuf> {
    if !template_path.exists() {
        return Err(MediaLibError::TemplateNotFound(
            template_path.display().to_string(),
        ));
    }

    let mut template = std::fs::read_to_string(template_path)?;

    for media_type in MediaType::ALL {
        let type_name = media_type.name().to_uppercase();
        let count = entry_count(catalog, media_type);

        template = template
            .replace(&format!("[BODY{}]", type_name), &build_body(catalog, media_type))
            .replace(&format!("[COUNT{}]", type_name), &format_count(count))
            .replace(
                &format!("[INFOCOUNT{}]", type_name),
                &format_info_count(media_type, count),
            );
    }

    template = template.replace(
        UPDATE_PLACEHOLDER,
        &chrono::Local::now().format(DATE_FORMAT).to_string(),
    );

    std::fs::create_dir_all(target_dir)?;
    let output_path = target_dir.join(OUTPUT_FILENAME);
    std::fs::write(&output_path, template)?;
    log::info!("Exported catalog to {}", output_path.display());

    copy_logo(template_path, target_dir);

    Ok(output_path)
}

/// Default template location: next to the executable, falling back to the
/// working directory.
pub fn default_template_path() -> PathBuf {
    let local = Path::new(ASSETS_FOLDER).join(TEMPLATE_FILENAME);

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let bundled = dir.join(ASSETS_FOLDER).join(TEMPLATE_FILENAME);
            if bundled.exists() {
                return bundled;
            }
        }
    }

    local
}

fn entry_count(catalog: &Catalog, media_type: MediaType) -> usize {
    match media_type {
        MediaType::Comic => catalog.comics.len(),
        MediaType::Book => catalog.books.len(),
        MediaType::Movie => catalog.movies.len(),
        MediaType::Music => catalog.music.len(),
    }
}

fn build_body(catalog: &Catalog, media_type: MediaType) -> String {
    match media_type {
        MediaType::Comic => media_body(&catalog.comics),
        MediaType::Book => media_body(&catalog.books),
        MediaType::Music => media_body(&catalog.music),
        MediaType::Movie => movie_body(catalog),
    }
}

fn media_body(entries: &[MediaRow]) -> String {
    if entries.is_empty() {
        return empty_row(4);
    }

    let mut sorted: Vec<&MediaRow> = entries.iter().collect();
    sorted.sort_by(|a, b| a.title.cmp(&b.title));

    let mut body = String::new();
    for (index, entry) in sorted.iter().enumerate() {
        body.push_str(&format!(
            "<tr>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n</tr>\n",
            index + 1,
            title_cell(&entry.title, &entry.link),
            entry.keywords,
            entry.created_at,
            entry.modified_at,
        ));
    }
    body
}

fn movie_body(catalog: &Catalog) -> String {
    if catalog.movies.is_empty() {
        return empty_row(6);
    }

    let mut sorted: Vec<_> = catalog.movies.iter().collect();
    sorted.sort_by(|a, b| a.title.cmp(&b.title));

    let mut body = String::new();
    for (index, entry) in sorted.iter().enumerate() {
        body.push_str(&format!(
            "<tr>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n</tr>\n",
            index + 1,
            title_cell(&entry.title, &entry.link),
            entry.keywords,
            entry.medium_type,
            entry.distributor,
            entry.created_at,
            entry.modified_at,
        ));
    }
    body
}

fn title_cell(title: &str, link: &str) -> String {
    if link.trim().is_empty() {
        title.to_string()
    } else {
        format!("<a href=\"{}\" target=\"_blank\">{}</a>", link, title)
    }
}

fn empty_row(column_count: usize) -> String {
    format!(
        "<tr>\n    <td colspan='{}'>{}</td>\n</tr>\n",
        column_count, EMPTY_BODY_TEXT
    )
}

/// Thousands-grouped count, e.g. 1234 -> "1,234".
fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Human-readable count phrase: singular label up to 1, plural above.
fn format_info_count(media_type: MediaType, count: usize) -> String {
    if count <= 1 {
        format!("{} {}", count, media_type.label())
    } else {
        format!("{} {}", format_count(count), media_type.label_plural())
    }
}

fn copy_logo(template_path: &Path, target_dir: &Path) {
    let Some(template_dir) = template_path.parent() else {
        return;
    };

    let logo = template_dir.join(LOGO_FILENAME);
    if !logo.exists() {
        return;
    }

    if let Err(e) = std::fs::copy(&logo, target_dir.join(LOGO_FILENAME)) {
        // A missing or unreadable logo never fails the export
        log::warn!("Could not copy logo to the target directory: {}", e);
    }
}
