// Settings
// Enumerated key/value configuration persisted in the settings table.
// Values are stored as strings; readers coerce into the type they need and
// fall back to a caller-supplied default when that fails.

use rusqlite::Connection;
use std::fmt;
use std::str::FromStr;

use crate::db::{self, schema};
use crate::error::Result;

/// The known settings keys. The numeric ids are stable storage ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsKey {
    FtpServer = 1,
    FtpUser = 2,
    FtpPassword = 3,
}

impl SettingsKey {
    pub const ALL: [SettingsKey; 3] = [
        SettingsKey::FtpServer,
        SettingsKey::FtpUser,
        SettingsKey::FtpPassword,
    ];

    pub fn id(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingsKey::FtpServer => "FtpServer",
            SettingsKey::FtpUser => "FtpUser",
            SettingsKey::FtpPassword => "FtpPassword",
        };
        f.write_str(name)
    }
}

/// Load the value of the desired key. The fallback is returned when the key
/// is missing, the stored value is empty, or the conversion fails —
/// conversion failures are logged, never propagated.
pub fn load_value<T: FromStr>(conn: &Connection, key: SettingsKey, fallback: T) -> Result<T> {
    let Some(row) = schema::get_setting(conn, key.id())? else {
        return Ok(fallback);
    };

    if row.value.is_empty() {
        return Ok(fallback);
    }

    match row.value.parse() {
        Ok(value) => Ok(value),
        Err(_) => {
            log::warn!(
                "Could not convert the value '{}' of key '{}', using the fallback",
                row.value,
                key
            );
            Ok(fallback)
        }
    }
}

/// Save a value. Inserts the key when it does not exist yet; an existing row
/// is only written (and its modified timestamp refreshed) when the value
/// actually changed.
pub fn save_value(conn: &Connection, key: SettingsKey, value: &str) -> Result<()> {
    let now = db::now_timestamp();

    match schema::get_setting(conn, key.id())? {
        None => {
            let description = format!("Value of key '{}'", key);
            schema::insert_setting(conn, key.id(), value, &description, &now)?;
        }
        Some(row) if row.value != value => {
            schema::update_setting_value(conn, key.id(), value, &now)?;
        }
        Some(_) => {}
    }

    Ok(())
}

/// Save a batch of values, applying the same change detection per key.
pub fn save_values(conn: &Connection, values: &[(SettingsKey, String)]) -> Result<()> {
    for (key, value) in values {
        save_value(conn, *key, value)?;
    }
    Ok(())
}
