//! Persisted trusted proxy list.
//!
//! The file is plain text: one ` # Updated: <timestamp>` line per write,
//! followed by one `RemoteIPTrustedProxy <address>` directive per address.
//! Existing files are copied to `<path>-<YYYYMMDDHHMM>.bak` before being
//! overwritten or appended to. Backup then write is not atomic.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::error::{IplistError, Result};
use crate::fs_abstraction::{FileSystem, RealFileSystem};
use crate::reconcile::Action;
use crate::validation::is_valid;

/// Apache mod_remoteip directive emitted for each address
pub const DIRECTIVE: &str = "RemoteIPTrustedProxy";

/// The address token must end at whitespace or end of line, so a token
/// with characters outside the class is skipped rather than cut short.
static DIRECTIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"RemoteIPTrustedProxy\s+(?P<address>[a-f0-9:/.]+)(?:\s|$)")
        .expect("directive pattern is a valid regex")
});

/// What a save did on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Backup copy made of the previous file, if there was one
    pub backup: Option<PathBuf>,
    /// False only for an append with nothing to add
    pub written: bool,
}

/// Loads and saves the directive file through a [`FileSystem`].
pub struct ListStore<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl ListStore<RealFileSystem> {
    pub fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl Default for ListStore<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> ListStore<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    /// Check whether a list file exists at `path`.
    pub fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    /// Load the addresses from an existing directive file, in file order.
    ///
    /// A missing file yields an empty list. Lines without a directive or
    /// whose address does not validate are ignored.
    pub fn load(&self, path: &Path) -> Result<Vec<String>> {
        if !self.fs.exists(path) {
            warn!("File not found: {}", path.display());
            return Ok(Vec::new());
        }

        debug!("Loading and parsing file: {}", path.display());
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| IplistError::from_io(path, e))?;

        Ok(parse_directives(&content))
    }

    /// Save `addresses` to `path`, stamped with the current time.
    pub fn save(&self, path: &Path, addresses: &[String], action: Action) -> Result<SaveOutcome> {
        self.save_at(path, addresses, action, Utc::now())
    }

    /// Save `addresses` to `path` using `now` for the backup name and header.
    ///
    /// An existing file is backed up first. `Append` with no addresses
    /// stops after the backup and writes nothing.
    pub fn save_at(
        &self,
        path: &Path,
        addresses: &[String],
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<SaveOutcome> {
        let backup = if self.fs.exists(path) {
            Some(self.backup(path, now)?)
        } else {
            None
        };

        if addresses.is_empty() && action == Action::Append {
            debug!("Nothing to change, skipping write");
            return Ok(SaveOutcome {
                backup,
                written: false,
            });
        }

        let payload = render(addresses, now);
        let written = match action {
            Action::Append => {
                debug!(
                    "Appending the following entries to the file: {}",
                    addresses.join(",")
                );
                self.fs.append(path, payload.as_bytes())
            }
            Action::Replace => self.fs.write(path, payload.as_bytes()),
        };
        written.map_err(|e| IplistError::from_io(path, e))?;

        Ok(SaveOutcome {
            backup,
            written: true,
        })
    }

    fn backup(&self, path: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        let backup = backup_path(path, now);
        if self.fs.exists(&backup) {
            return Err(IplistError::BackupCollision(backup));
        }

        debug!(
            "Making a backup of '{}' to '{}'",
            path.display(),
            backup.display()
        );
        self.fs
            .copy(path, &backup)
            .map_err(|e| IplistError::from_io(&backup, e))?;
        Ok(backup)
    }
}

/// Backup name for `path` at minute resolution: `<path>-<YYYYMMDDHHMM>.bak`.
pub fn backup_path(path: &Path, now: DateTime<Utc>) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!("-{}.bak", now.format("%Y%m%d%H%M")));
    PathBuf::from(name)
}

/// Render the header line and one directive per address.
pub fn render(addresses: &[String], now: DateTime<Utc>) -> String {
    let mut out = format!(" # Updated: {}\n", now.format("%Y-%m-%dT%H:%M:%S%z"));
    for address in addresses {
        out.push_str(DIRECTIVE);
        out.push(' ');
        out.push_str(address);
        out.push('\n');
    }
    out
}

/// Extract valid addresses from directive lines, in order.
pub fn parse_directives(content: &str) -> Vec<String> {
    let mut addresses = Vec::new();
    for line in content.lines() {
        let Some(caps) = DIRECTIVE_PATTERN.captures(line) else {
            continue;
        };
        let address = &caps["address"];
        if is_valid(address) {
            debug!("Adding {} to input data", address);
            addresses.push(address.to_string());
        } else {
            debug!("Skipping {}, not an IP", line);
        }
    }
    addresses
}
