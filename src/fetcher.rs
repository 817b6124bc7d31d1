//! HTTP fetcher for downloading IP range lists.
//!
//! Lists are plain text, one address or CIDR network per line. URLs are
//! fetched one at a time in the order given.

use anyhow::Context;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::{IplistError, Result};
use crate::utils::{format_count, truncate};
use crate::validation::is_valid;

const TIMEOUT_SECS: u64 = 30;

/// Maximum size per list (10 MB)
/// Cloudflare's lists are well under 1 KB, so this only stops runaway responses
const MAX_LIST_SIZE: usize = 10 * 1024 * 1024;

/// Longest slice of a rejected line echoed back in errors
const MAX_ECHOED_LINE: usize = 64;

/// HTTP client for fetching lists
pub struct Fetcher {
    client: Client,
    max_size: usize,
}

impl Fetcher {
    /// Create a new fetcher with default settings
    pub fn new() -> anyhow::Result<Self> {
        Self::with_limits(Duration::from_secs(TIMEOUT_SECS), MAX_LIST_SIZE)
    }

    /// Create a fetcher with a custom request timeout and response size cap
    pub fn with_limits(timeout: Duration, max_size: usize) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("apache-cf-iplist/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, max_size })
    }

    /// Fetch a URL and split the body into raw lines.
    ///
    /// Any non-success status is a failure. Lines are returned untouched.
    pub async fn fetch_lines(&self, url: &str) -> Result<Vec<String>> {
        debug!("Fetching {}", url);

        let transport = |e: reqwest::Error| IplistError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(IplistError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_size {
                return Err(IplistError::ResponseTooLarge {
                    url: url.to_string(),
                    size: content_length as usize,
                    max: self.max_size,
                });
            }
        }

        let body = response.text().await.map_err(transport)?;

        // Double-check actual size after download
        if body.len() > self.max_size {
            return Err(IplistError::ResponseTooLarge {
                url: url.to_string(),
                size: body.len(),
                max: self.max_size,
            });
        }

        Ok(body.split('\n').map(str::to_string).collect())
    }

    /// Fetch a URL and validate every non-blank line.
    ///
    /// A single invalid line rejects the whole response.
    pub async fn fetch_validated(&self, url: &str) -> Result<Vec<String>> {
        let lines = self.fetch_lines(url).await?;
        validate_lines(url, &lines)
    }

    /// Fetch every URL in order and concatenate the validated results.
    ///
    /// Transport, status and size failures are logged and that URL
    /// contributes nothing. Validation failures abort.
    pub async fn fetch_all(&self, urls: &[String]) -> Result<Vec<String>> {
        let mut addresses = Vec::new();

        for url in urls {
            match self.fetch_validated(url).await {
                Ok(found) => {
                    info!("Fetched {} - {} entries", url, format_count(found.len()));
                    addresses.extend(found);
                }
                Err(e) if e.is_recoverable() => {
                    error!("{}, skipping", e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(addresses)
    }
}

// Note: Default is intentionally not implemented for Fetcher
// because new() can fail and we want explicit error handling.

/// Validate raw lines from `url`, returning the trimmed addresses.
///
/// Addresses are lowercased so IPv6 hex digits match what the directive
/// file loader accepts.
pub fn validate_lines(url: &str, lines: &[String]) -> Result<Vec<String>> {
    let mut addresses = Vec::with_capacity(lines.len());

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !is_valid(trimmed) {
            return Err(IplistError::InvalidAddress {
                url: url.to_string(),
                line: truncate(trimmed, MAX_ECHOED_LINE),
            });
        }
        addresses.push(trimmed.to_ascii_lowercase());
    }

    Ok(addresses)
}
