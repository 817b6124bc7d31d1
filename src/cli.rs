//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{DEFAULT_LIST_PATH, DEFAULT_URLS};
use crate::reconcile::Action;

#[derive(Parser, Debug)]
#[command(name = "apache-cf-iplist")]
#[command(
    author,
    version,
    about = "Pull IP lists from URLs and write Apache RemoteIPTrustedProxy directives"
)]
pub struct Cli {
    /// Load existing list from a file (append mode only)
    #[arg(short, long, default_value = DEFAULT_LIST_PATH)]
    pub input: PathBuf,

    /// Write list to a file
    #[arg(short, long, default_value = DEFAULT_LIST_PATH)]
    pub output: PathBuf,

    /// URL to grab, repeat for more than one. Defaults to Cloudflare's IPv4 and IPv6 lists
    #[arg(short, long = "url", value_name = "URL", default_values_t = DEFAULT_URLS.map(String::from))]
    pub urls: Vec<String>,

    /// Don't make changes
    #[arg(short, long)]
    pub noop: bool,

    /// Either append new entries or replace the file
    #[arg(short, long, value_enum, default_value_t = Action::Replace)]
    pub action: Action,

    /// Set logging to debug
    #[arg(short, long, conflicts_with = "quiet")]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}
