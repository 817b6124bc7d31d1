//! Run settings derived from the command line.

use reqwest::Url;
use std::path::PathBuf;
use tracing::warn;

use crate::cli::Cli;
use crate::error::{IplistError, Result};
use crate::reconcile::Action;

/// Default path for both the input and output list
pub const DEFAULT_LIST_PATH: &str = "./cloudflare-ip-list.conf";

/// Cloudflare's published edge ranges
pub const DEFAULT_URLS: [&str; 2] = [
    "https://www.cloudflare.com/ips-v4",
    "https://www.cloudflare.com/ips-v6",
];

/// Validated settings for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub urls: Vec<String>,
    pub noop: bool,
    pub action: Action,
}

impl Settings {
    /// Build settings from parsed flags.
    ///
    /// In append mode the output is the input file, since that is the list
    /// new entries are computed against.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let output = if cli.action == Action::Append && cli.output != cli.input {
            warn!(
                "Setting output to '{}', was '{}' as append mode is enabled.",
                cli.input.display(),
                cli.output.display()
            );
            cli.input.clone()
        } else {
            cli.output.clone()
        };

        let settings = Self {
            input: cli.input.clone(),
            output,
            urls: cli.urls.clone(),
            noop: cli.noop,
            action: cli.action,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Every URL must be absolute http(s).
    pub fn validate(&self) -> Result<()> {
        for url in &self.urls {
            let parsed = Url::parse(url).map_err(|e| IplistError::InvalidUrl(format!("{}: {}", url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(IplistError::InvalidUrl(format!(
                    "{}: scheme must be http or https",
                    url
                )));
            }
        }
        Ok(())
    }
}
