// FTP publish
// Uploads the rendered report to the configured FTP server as /index.html.

use rusqlite::Connection;
use std::fs::File;
use std::path::Path;
use suppaftp::FtpStream;

use crate::constants::{DEFAULT_FTP_PORT, REMOTE_REPORT_PATH};
use crate::error::Result;
use crate::settings::{self, SettingsKey};

/// The FTP connection settings, loaded from the settings store.
#[derive(Debug, Clone, Default)]
pub struct FtpSettings {
    pub server: String,
    pub username: String,
    pub password: String,
}

impl FtpSettings {
    pub fn load(conn: &Connection) -> Result<FtpSettings> {
        Ok(FtpSettings {
            server: settings::load_value(conn, SettingsKey::FtpServer, String::new())?,
            username: settings::load_value(conn, SettingsKey::FtpUser, String::new())?,
            password: settings::load_value(conn, SettingsKey::FtpPassword, String::new())?,
        })
    }

    /// At minimum a server address is required before any upload attempt.
    pub fn is_complete(&self) -> bool {
        !self.server.is_empty()
    }

    /// Server address with the default FTP port appended when none is given.
    fn address(&self) -> String {
        if self.server.contains(':') {
            self.server.clone()
        } else {
            format!("{}:{}", self.server, DEFAULT_FTP_PORT)
        }
    }
}

/// Upload the file to the server, overwriting any previous report.
/// Transport failures propagate to the caller.
pub fn upload_file(filepath: &Path, settings: &FtpSettings) -> Result<()> {
    log::debug!(
        "Connect to ftp server '{}' with user '{}'...",
        settings.server,
        settings.username
    );

    let mut ftp = FtpStream::connect(settings.address())?;
    ftp.login(&settings.username, &settings.password)?;

    log::debug!("Connection established.");
    log::debug!("Upload file '{}'...", filepath.display());

    let mut file = File::open(filepath)?;
    let bytes = ftp.put_file(REMOTE_REPORT_PATH, &mut file)?;

    log::debug!("Upload result: {} bytes written", bytes);

    ftp.quit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::migrations::run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn settings_load_from_store() {
        let conn = setup();
        settings::save_value(&conn, SettingsKey::FtpServer, "ftp.example.org").unwrap();
        settings::save_value(&conn, SettingsKey::FtpUser, "alice").unwrap();
        settings::save_value(&conn, SettingsKey::FtpPassword, "secret").unwrap();

        let ftp = FtpSettings::load(&conn).unwrap();
        assert_eq!(ftp.server, "ftp.example.org");
        assert_eq!(ftp.username, "alice");
        assert_eq!(ftp.password, "secret");
        assert!(ftp.is_complete());
    }

    #[test]
    fn missing_server_is_incomplete() {
        let conn = setup();
        let ftp = FtpSettings::load(&conn).unwrap();
        assert!(!ftp.is_complete());
    }

    #[test]
    fn address_appends_default_port() {
        let ftp = FtpSettings {
            server: "ftp.example.org".to_string(),
            ..Default::default()
        };
        assert_eq!(ftp.address(), "ftp.example.org:21");

        let ftp = FtpSettings {
            server: "ftp.example.org:2121".to_string(),
            ..Default::default()
        };
        assert_eq!(ftp.address(), "ftp.example.org:2121");
    }
}
