//! Error types for apache-cf-iplist.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IplistError {
    #[error("Failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Response from {url} too large: {size} bytes (max: {max} bytes)")]
    ResponseTooLarge { url: String, size: usize, max: usize },

    #[error("Invalid address in response from {url}: {line:?}")]
    InvalidAddress { url: String, line: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Backup file {0:?} already exists")]
    BackupCollision(PathBuf),

    #[error("Permission denied on {path:?}: {source}")]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Asked to append but input file {0:?} doesn't exist")]
    MissingInput(PathBuf),
}

impl IplistError {
    /// Wrap an I/O error, keeping permission failures distinct.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            IplistError::Permission { path, source }
        } else {
            IplistError::Io { path, source }
        }
    }

    /// Per-URL fetch failures that are logged and skipped rather than
    /// aborting the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IplistError::Transport { .. }
                | IplistError::HttpStatus { .. }
                | IplistError::ResponseTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IplistError>;
