// MediaLib - Library Entry Point
// A personal media catalog: movies, comics, books and music in SQLite, with
// CSV import, static HTML export and FTP publishing.

pub mod constants;
pub mod error;
pub mod db;
pub mod catalog;
pub mod import;
pub mod export;
pub mod settings;
pub mod publish;
