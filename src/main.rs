// MediaLib CLI binary

use std::path::PathBuf;
use clap::{Parser, Subcommand};
use anyhow::Result;

use medialib::catalog::{Catalog, CatalogEntry, MediaType};
use medialib::db;
use medialib::db::schema::{MediaRow, MovieRow};
use medialib::export;
use medialib::import;
use medialib::publish::{self, FtpSettings};
use medialib::settings::{self, SettingsKey};

#[derive(Parser)]
#[command(name = "medialib")]
#[command(about = "MediaLib - A personal media catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Database file (defaults to ~/.medialib/medialib.db)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the catalog database
    Init,

    /// List catalog entries
    List {
        /// Only show one media type (comic, book, movie, music)
        #[arg(short, long)]
        media: Option<MediaType>,
        /// Case-insensitive filter over title and keywords
        #[arg(short, long)]
        filter: Option<String>,
        /// Emit the entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a new entry
    Add {
        /// Media type (comic, book, movie, music)
        media: MediaType,
        /// Entry title
        title: String,
        /// Optional link
        #[arg(short, long)]
        link: Option<String>,
        /// Comma-separated keywords
        #[arg(short, long)]
        keywords: Option<String>,
        /// Medium type id (movies only, required)
        #[arg(long)]
        medium_type: Option<i64>,
        /// Distributor id (movies only)
        #[arg(long)]
        distributor: Option<i64>,
    },

    /// Delete an entry
    Delete {
        /// Media type (comic, book, movie, music)
        media: MediaType,
        /// Entry id
        id: i64,
    },

    /// Import entries from a semicolon-delimited CSV file
    Import {
        /// CSV file: title;mediaTypeId;mediumTypeId;distributorId
        path: PathBuf,
    },

    /// Export the catalog as a static HTML report
    Export {
        /// Target directory for index.html
        target: PathBuf,
        /// Template file (defaults to assets/index.html)
        #[arg(short, long)]
        template: Option<PathBuf>,
    },

    /// Export into a temporary directory and upload via FTP
    Publish {
        /// Template file (defaults to assets/index.html)
        #[arg(short, long)]
        template: Option<PathBuf>,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// List the medium type and distributor lookups
    Lookups,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show the stored settings
    Show,
    /// Store the FTP connection settings
    SetFtp {
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let db_path = match cli.database {
        Some(path) => path,
        None => db::default_db_path()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&db_path),
        Commands::List { media, filter, json } => cmd_list(&db_path, media, filter, json),
        Commands::Add {
            media,
            title,
            link,
            keywords,
            medium_type,
            distributor,
        } => cmd_add(&db_path, media, title, link, keywords, medium_type, distributor),
        Commands::Delete { media, id } => cmd_delete(&db_path, media, id),
        Commands::Import { path } => cmd_import(&db_path, path),
        Commands::Export { target, template } => cmd_export(&db_path, target, template),
        Commands::Publish { template } => cmd_publish(&db_path, template),
        Commands::Settings { command } => cmd_settings(&db_path, command),
        Commands::Lookups => cmd_lookups(&db_path),
    }
}

fn open_catalog(db_path: &std::path::Path) -> Result<Catalog> {
    let mut catalog = Catalog::open(db_path)?;
    catalog.load_lookups()?;
    catalog.load_catalog()?;
    Ok(catalog)
}

fn cmd_init(db_path: &std::path::Path) -> Result<()> {
    let _catalog = Catalog::open(db_path)?;
    println!("Initialized catalog database at {}", db_path.display());
    println!("Seeded lookups:");
    println!("  medium types:  DVD, Blu-ray, VHS, Other, Digital");
    println!("  distributors:  Amazon, Netflix, Disney+, Sony (PSN)");
    Ok(())
}

fn cmd_list(
    db_path: &std::path::Path,
    media: Option<MediaType>,
    filter: Option<String>,
    json: bool,
) -> Result<()> {
    let catalog = open_catalog(db_path)?;
    let filter = filter.unwrap_or_default().to_lowercase();

    let types = match media {
        Some(t) => vec![t],
        None => MediaType::ALL.to_vec(),
    };

    if json {
        let mut output = serde_json::Map::new();
        for media_type in &types {
            let value = match media_type {
                MediaType::Movie => serde_json::to_value(
                    catalog
                        .movies
                        .iter()
                        .filter(|m| movie_matches(m, &filter))
                        .collect::<Vec<_>>(),
                )?,
                MediaType::Comic => filtered_json(&catalog.comics, &filter)?,
                MediaType::Book => filtered_json(&catalog.books, &filter)?,
                MediaType::Music => filtered_json(&catalog.music, &filter)?,
            };
            output.insert(media_type.name().to_lowercase(), value);
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for media_type in types {
        match media_type {
            MediaType::Movie => print_movies(&catalog, &filter),
            MediaType::Comic => print_media(media_type, &catalog.comics, &filter),
            MediaType::Book => print_media(media_type, &catalog.books, &filter),
            MediaType::Music => print_media(media_type, &catalog.music, &filter),
        }
        println!();
    }

    Ok(())
}

fn filtered_json(entries: &[MediaRow], filter: &str) -> Result<serde_json::Value> {
    let filtered: Vec<&MediaRow> = entries.iter().filter(|e| media_matches(e, filter)).collect();
    Ok(serde_json::to_value(filtered)?)
}

fn media_matches(entry: &MediaRow, filter: &str) -> bool {
    filter.is_empty()
        || entry.title.to_lowercase().contains(filter)
        || entry.keywords.to_lowercase().contains(filter)
}

fn movie_matches(entry: &MovieRow, filter: &str) -> bool {
    filter.is_empty()
        || entry.title.to_lowercase().contains(filter)
        || entry.keywords.to_lowercase().contains(filter)
        || entry.medium_type.to_lowercase().contains(filter)
        || entry.distributor.to_lowercase().contains(filter)
}

fn print_media(media_type: MediaType, entries: &[MediaRow], filter: &str) {
    let entries: Vec<&MediaRow> = entries.iter().filter(|e| media_matches(e, filter)).collect();

    println!("{} ({})", media_type.label_plural(), entries.len());
    if entries.is_empty() {
        println!("  No entries.");
        return;
    }

    println!("{:>5}  {:<40}  {}", "ID", "Title", "Keywords");
    println!("{}", "-".repeat(70));
    for entry in entries {
        println!("{:>5}  {:<40}  {}", entry.id, truncate(&entry.title, 40), entry.keywords);
    }
}

fn print_movies(catalog: &Catalog, filter: &str) {
    let movies: Vec<&MovieRow> = catalog
        .movies
        .iter()
        .filter(|m| movie_matches(m, filter))
        .collect();

    println!("Movies ({})", movies.len());
    if movies.is_empty() {
        println!("  No entries.");
        return;
    }

    println!(
        "{:>5}  {:<40}  {:<10}  {:<12}  {}",
        "ID", "Title", "Medium", "Distributor", "Keywords"
    );
    println!("{}", "-".repeat(90));
    for movie in movies {
        println!(
            "{:>5}  {:<40}  {:<10}  {:<12}  {}",
            movie.id,
            truncate(&movie.title, 40),
            movie.medium_type,
            movie.distributor,
            movie.keywords
        );
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let cut: String = value.chars().take(max - 3).collect();
        format!("{}...", cut)
    } else {
        value.to_string()
    }
}

fn cmd_add(
    db_path: &std::path::Path,
    media: MediaType,
    title: String,
    link: Option<String>,
    keywords: Option<String>,
    medium_type: Option<i64>,
    distributor: Option<i64>,
) -> Result<()> {
    let mut catalog = open_catalog(db_path)?;

    let mut entry = match media {
        MediaType::Movie => {
            let medium_type_id = medium_type
                .ok_or_else(|| anyhow::anyhow!("--medium-type is required for movies"))?;
            CatalogEntry::Movie(MovieRow {
                title: title.clone(),
                link: link.unwrap_or_default(),
                keywords: keywords.unwrap_or_default(),
                medium_type_id,
                distributor_id: distributor,
                ..Default::default()
            })
        }
        MediaType::Comic => CatalogEntry::Comic(base_row(&title, link, keywords)),
        MediaType::Book => CatalogEntry::Book(base_row(&title, link, keywords)),
        MediaType::Music => CatalogEntry::Music(base_row(&title, link, keywords)),
    };

    // A taken title is a normal outcome, not an error
    let unique = match media {
        MediaType::Movie => {
            catalog.is_movie_title_unique(0, &title, medium_type.unwrap_or_default())?
        }
        _ => catalog.is_title_unique(media, &entry)?,
    };
    if !unique {
        println!("A {} with the title '{}' already exists.", media, title);
        return Ok(());
    }

    catalog.save(media, &mut entry)?;

    let id = match &entry {
        CatalogEntry::Movie(row) => row.id,
        CatalogEntry::Comic(row) | CatalogEntry::Book(row) | CatalogEntry::Music(row) => row.id,
    };
    println!("Added {} '{}' with id {}", media, title, id);

    Ok(())
}

fn base_row(title: &str, link: Option<String>, keywords: Option<String>) -> MediaRow {
    MediaRow {
        title: title.to_string(),
        link: link.unwrap_or_default(),
        keywords: keywords.unwrap_or_default(),
        ..Default::default()
    }
}

fn cmd_delete(db_path: &std::path::Path, media: MediaType, id: i64) -> Result<()> {
    let mut catalog = open_catalog(db_path)?;

    let entry = match media {
        MediaType::Movie => catalog
            .movies
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .map(CatalogEntry::Movie),
        MediaType::Comic => catalog
            .comics
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .map(CatalogEntry::Comic),
        MediaType::Book => catalog
            .books
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .map(CatalogEntry::Book),
        MediaType::Music => catalog
            .music
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .map(CatalogEntry::Music),
    };

    let Some(entry) = entry else {
        anyhow::bail!("No {} with id {} found", media, id);
    };

    catalog.delete(media, &entry)?;
    println!("Deleted {} {}", media, id);

    Ok(())
}

fn cmd_import(db_path: &std::path::Path, path: PathBuf) -> Result<()> {
    let mut catalog = open_catalog(db_path)?;

    let summary = import::import_csv_file(&mut catalog, &path)?;

    println!("Import complete:");
    println!("  Parsed:    {}", summary.parsed);
    println!("  Imported:  {}", summary.imported);
    println!("  Skipped:   {}", summary.skipped);

    Ok(())
}

fn cmd_export(
    db_path: &std::path::Path,
    target: PathBuf,
    template: Option<PathBuf>,
) -> Result<()> {
    let catalog = open_catalog(db_path)?;
    let template = template.unwrap_or_else(export::default_template_path);

    let output = export::export_html(&catalog, &template, &target)?;
    println!("Exported catalog to {}", output.display());

    Ok(())
}

fn cmd_publish(db_path: &std::path::Path, template: Option<PathBuf>) -> Result<()> {
    let catalog = open_catalog(db_path)?;
    let template = template.unwrap_or_else(export::default_template_path);

    let ftp = FtpSettings::load(catalog.connection())?;
    if !ftp.is_complete() {
        println!(
            "The ftp settings are missing! Store them with 'medialib settings set-ftp' and try again."
        );
        return Ok(());
    }

    // Render into a temporary directory, then upload
    let temp_dir = std::env::temp_dir().join("medialib-publish");
    let output = export::export_html(&catalog, &template, &temp_dir)?;
    publish::upload_file(&output, &ftp)?;

    println!("Report uploaded to {}", ftp.server);

    Ok(())
}

fn cmd_settings(db_path: &std::path::Path, command: SettingsCommands) -> Result<()> {
    let conn = db::open_db(db_path)?;

    match command {
        SettingsCommands::Show => {
            for key in SettingsKey::ALL {
                let value: String = settings::load_value(&conn, key, String::new())?;
                let display = if key == SettingsKey::FtpPassword && !value.is_empty() {
                    "***".to_string()
                } else {
                    value
                };
                println!("{:<12}  {}", key.to_string(), display);
            }
        }
        SettingsCommands::SetFtp { server, user, password } => {
            let mut values = Vec::new();
            if let Some(server) = server {
                values.push((SettingsKey::FtpServer, server));
            }
            if let Some(user) = user {
                values.push((SettingsKey::FtpUser, user));
            }
            if let Some(password) = password {
                values.push((SettingsKey::FtpPassword, password));
            }

            if values.is_empty() {
                println!("Nothing to store. Pass --server, --user and/or --password.");
                return Ok(());
            }

            settings::save_values(&conn, &values)?;
            println!("Settings stored.");
        }
    }

    Ok(())
}

fn cmd_lookups(db_path: &std::path::Path) -> Result<()> {
    let mut catalog = Catalog::open(db_path)?;
    catalog.load_lookups()?;

    println!("Medium types:");
    for lookup in &catalog.medium_types {
        println!("{:>5}  {}", lookup.id, lookup.name);
    }

    println!();
    println!("Distributors:");
    for lookup in &catalog.distributors {
        println!("{:>5}  {}", lookup.id, lookup.name);
    }

    Ok(())
}
