// MediaLib Constants

// Paths
pub const MEDIALIB_FOLDER: &str = ".medialib";
pub const DB_FILENAME: &str = "medialib.db";
pub const ASSETS_FOLDER: &str = "assets";

// HTML export
pub const TEMPLATE_FILENAME: &str = "index.html";
pub const OUTPUT_FILENAME: &str = "index.html";
pub const LOGO_FILENAME: &str = "logo.png";
pub const UPDATE_PLACEHOLDER: &str = "[UPDATE]";
pub const EMPTY_BODY_TEXT: &str = "No data available";

// FTP publish
pub const REMOTE_REPORT_PATH: &str = "/index.html";
pub const DEFAULT_FTP_PORT: u16 = 21;

// Time
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// CSV import
pub const CSV_DELIMITER: char = ';';
pub const CSV_FIELD_COUNT: usize = 4;
