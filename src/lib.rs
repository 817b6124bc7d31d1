//! # apache-cf-iplist - Trusted proxy lists for Apache mod_remoteip
//!
//! Pulls IP range lists (Cloudflare's by default) from URLs and writes them
//! as `RemoteIPTrustedProxy` directives, either replacing the file or
//! appending only the ranges it doesn't already contain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      apache-cf-iplist                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap) -> Settings                                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls)                                 │
//! │    └── one URL at a time, whole response rejected on a     │
//! │        single invalid line                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Validation (ipnet)                                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Reconcile: replace | append (skip already present)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ListStore (FileSystem trait)                               │
//! │    └── timestamped backup, then write or append             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use apache_cf_iplist::fetcher::Fetcher;
//! use apache_cf_iplist::reconcile::{resolve, Action};
//! use apache_cf_iplist::store::ListStore;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let path = Path::new("/etc/apache2/conf-available/cloudflare.conf");
//!     let store = ListStore::new();
//!     let existing = store.load(path)?;
//!
//!     let fetcher = Fetcher::new()?;
//!     let urls = vec!["https://www.cloudflare.com/ips-v4".to_string()];
//!     let fetched = fetcher.fetch_all(&urls).await?;
//!
//!     let new_entries = resolve(&existing, &fetched, Action::Append);
//!     store.save(path, &new_entries, Action::Append)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - The update pipeline behind the CLI
//! - [`config`] - Defaults and validated run settings
//! - [`error`] - Typed errors
//! - [`fetcher`] - HTTP client for downloading lists
//! - [`fs_abstraction`] - Filesystem trait used by the store
//! - [`reconcile`] - Replace/append reconciliation
//! - [`store`] - Directive file load/save with backups
//! - [`utils`] - Formatting helpers
//! - [`validation`] - Address and CIDR validation

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod fs_abstraction;
pub mod reconcile;
pub mod store;
pub mod utils;
pub mod validation;

pub use cli::Cli;
pub use config::Settings;
pub use error::IplistError;
pub use reconcile::Action;
