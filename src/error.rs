// MediaLib Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaLibError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The media type '{0}' is not supported for this entry")]
    UnsupportedType(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("FTP error: {0}")]
    Ftp(#[from] suppaftp::FtpError),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for MediaLibError {
    fn from(err: anyhow::Error) -> Self {
        MediaLibError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MediaLibError>;
