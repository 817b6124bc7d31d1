//! Update command implementation.
//!
//! Load the existing list (append mode), fetch every URL, reconcile and
//! write the result with a backup of the previous file.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::IplistError;
use crate::fetcher::Fetcher;
use crate::fs_abstraction::FileSystem;
use crate::reconcile::{resolve, Action};
use crate::store::{ListStore, SaveOutcome};
use crate::utils::format_count;

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Addresses that passed validation across all URLs
    pub fetched: usize,
    /// Addresses selected for writing
    pub resolved: Vec<String>,
    /// Present when the file was saved
    pub saved: Option<SaveOutcome>,
}

/// Run the update
pub async fn run(settings: &Settings) -> Result<RunSummary> {
    run_with_store(settings, &ListStore::new()).await
}

/// Run the update against a specific store
pub async fn run_with_store<F: FileSystem>(
    settings: &Settings,
    store: &ListStore<F>,
) -> Result<RunSummary> {
    debug!("In {} mode", settings.action);
    debug!("Input file:  {}", settings.input.display());
    debug!("Output file: {}", settings.output.display());

    if settings.noop {
        warn!("In noop mode, no files will be changed.");
    } else {
        debug!("Will modify files.");
    }

    let existing = match settings.action {
        Action::Append => {
            if !store.exists(&settings.input) {
                return Err(IplistError::MissingInput(settings.input.clone()).into());
            }
            store
                .load(&settings.input)
                .with_context(|| format!("Failed to load {}", settings.input.display()))?
        }
        Action::Replace => Vec::new(),
    };

    let fetcher = Fetcher::new()?;
    let candidates = fetcher.fetch_all(&settings.urls).await?;
    let resolved = resolve(&existing, &candidates, settings.action);

    let mut summary = RunSummary {
        fetched: candidates.len(),
        resolved,
        saved: None,
    };

    match settings.action {
        Action::Append => {
            debug!("New IPs to add to list: {:?}", summary.resolved);
            if summary.resolved.is_empty() {
                info!("No new addresses, nothing to change");
                return Ok(summary);
            }
        }
        Action::Replace => debug!("Full list: {:?}", summary.resolved),
    }

    if settings.noop {
        info!(
            "Would write {} entries to {}",
            format_count(summary.resolved.len()),
            settings.output.display()
        );
        return Ok(summary);
    }

    let outcome = store
        .save(&settings.output, &summary.resolved, settings.action)
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;

    if let Some(backup) = &outcome.backup {
        warn!("Need to clean up backup file {}", backup.display());
    }
    info!(
        "Wrote {} entries to {}",
        format_count(summary.resolved.len()),
        settings.output.display()
    );

    summary.saved = Some(outcome);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::test_server::{refused_url, serve_once};
    use crate::fs_abstraction::MockFileSystem;
    use std::path::Path;
    use tempfile::TempDir;

    fn settings(path: &Path, urls: Vec<String>, action: Action, noop: bool) -> Settings {
        Settings {
            input: path.to_path_buf(),
            output: path.to_path_buf(),
            urls,
            noop,
            action,
        }
    }

    #[tokio::test]
    async fn test_replace_writes_fetched_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cf.conf");
        let v4 = serve_once("200 OK", "1.0.0.0/24\n173.245.48.0/20\n").await;
        let v6 = serve_once("200 OK", "2606:4700::/32\n").await;

        let summary = run(&settings(&path, vec![v4, v6], Action::Replace, false))
            .await
            .unwrap();

        assert_eq!(summary.fetched, 3);
        let saved = summary.saved.unwrap();
        assert!(saved.written);
        assert!(saved.backup.is_none());
        assert_eq!(
            ListStore::new().load(&path).unwrap(),
            vec!["1.0.0.0/24", "173.245.48.0/20", "2606:4700::/32"]
        );
    }

    #[tokio::test]
    async fn test_replace_survives_one_failed_url() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cf.conf");
        let down = refused_url().await;
        let v6 = serve_once("200 OK", "2606:4700::/32\n").await;

        let summary = run(&settings(&path, vec![down, v6], Action::Replace, false))
            .await
            .unwrap();

        assert_eq!(summary.resolved, vec!["2606:4700::/32"]);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_append_adds_only_new() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cf.conf");
        std::fs::write(&path, "RemoteIPTrustedProxy 1.1.1.1/32\n").unwrap();
        let url = serve_once("200 OK", "1.1.1.1/32\n8.8.8.8/32\n").await;

        let summary = run(&settings(&path, vec![url], Action::Append, false))
            .await
            .unwrap();

        assert_eq!(summary.resolved, vec!["8.8.8.8/32"]);
        assert!(summary.saved.unwrap().backup.is_some());
        assert_eq!(
            ListStore::new().load(&path).unwrap(),
            vec!["1.1.1.1/32", "8.8.8.8/32"]
        );
    }

    #[tokio::test]
    async fn test_append_nothing_new_skips_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cf.conf");
        std::fs::write(&path, "RemoteIPTrustedProxy 1.1.1.1/32\n").unwrap();
        let url = serve_once("200 OK", "1.1.1.1/32\n").await;

        let summary = run(&settings(&path, vec![url], Action::Append, false))
            .await
            .unwrap();

        assert!(summary.resolved.is_empty());
        assert!(summary.saved.is_none());
        // No backup either, the run stops before save
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_append_missing_input_fails_before_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.conf");
        let url = refused_url().await;

        let err = run(&settings(&path, vec![url], Action::Append, false))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<IplistError>(),
            Some(IplistError::MissingInput(_))
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_append_missing_input_checked_through_store() {
        let mut mock = MockFileSystem::new();
        mock.expect_exists()
            .withf(|p| p == Path::new("/etc/apache2/cf.conf"))
            .times(1)
            .returning(|_| false);
        mock.expect_read_to_string().never();
        mock.expect_write().never();
        mock.expect_append().never();
        let store = ListStore::with_fs(mock);
        let url = refused_url().await;

        let err = run_with_store(
            &settings(Path::new("/etc/apache2/cf.conf"), vec![url], Action::Append, false),
            &store,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<IplistError>(),
            Some(IplistError::MissingInput(_))
        ));
    }

    #[tokio::test]
    async fn test_noop_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cf.conf");
        let url = serve_once("200 OK", "1.0.0.0/24\n").await;

        let summary = run(&settings(&path, vec![url], Action::Replace, true))
            .await
            .unwrap();

        assert_eq!(summary.resolved, vec!["1.0.0.0/24"]);
        assert!(summary.saved.is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_invalid_content_aborts_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cf.conf");
        std::fs::write(&path, "RemoteIPTrustedProxy 1.1.1.1/32\n").unwrap();
        let url = serve_once("200 OK", "1.1.1.1/32\nnot-an-ip\n").await;

        let err = run(&settings(&path, vec![url], Action::Replace, false))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<IplistError>(),
            Some(IplistError::InvalidAddress { .. })
        ));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "RemoteIPTrustedProxy 1.1.1.1/32\n"
        );
    }
}
