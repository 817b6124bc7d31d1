//! Reconcile freshly fetched addresses against the ones already on disk.

use clap::ValueEnum;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// How fetched addresses are combined with the existing list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Add only addresses not already present
    Append,
    /// Overwrite the list with the fetched addresses
    #[default]
    Replace,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Append => write!(f, "append"),
            Action::Replace => write!(f, "replace"),
        }
    }
}

/// Produce the list of addresses to persist.
///
/// `Replace` returns `candidates` unchanged, in fetch order. `Append` returns
/// the candidates not present in `existing`, keeping the first occurrence of
/// each in fetch order. An empty append result means there is nothing to write.
pub fn resolve(existing: &[String], candidates: &[String], action: Action) -> Vec<String> {
    match action {
        Action::Replace => {
            for address in candidates {
                debug!("Adding {} to list.", address);
            }
            candidates.to_vec()
        }
        Action::Append => {
            let mut seen: HashSet<&str> = existing.iter().map(String::as_str).collect();
            let mut result = Vec::new();
            for address in candidates {
                if seen.insert(address.as_str()) {
                    debug!("Adding new IP {} to list.", address);
                    result.push(address.clone());
                } else {
                    debug!("Address {} already in list, skipping.", address);
                }
            }
            result
        }
    }
}
