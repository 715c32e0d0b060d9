//! Provenance stamped onto every assembled subgraph.

use chrono::{DateTime, Utc};
use git2::Repository;
use std::path::Path;
use tracing::debug;

pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub timestamp: DateTime<Utc>,
    pub tool_version: String,
    pub commit_hash: Option<String>,
}

impl Stamp {
    /// Current time with this crate's version.
    pub fn now(commit_hash: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            tool_version: TOOL_VERSION.to_string(),
            commit_hash,
        }
    }

    /// Stamp for `root`: current time plus the checked-out commit, if any.
    pub fn for_project(root: &Path) -> Self {
        Self::now(read_commit_hash(root))
    }
}

/// The commit `HEAD` points at in the repository containing `root`.
///
/// Discovery walks up from `root`, so subdirectories, worktrees and
/// submodules resolve too. Returns `None` outside a repository or on an
/// unborn branch.
pub fn read_commit_hash(root: &Path) -> Option<String> {
    let repo = match Repository::discover(root) {
        Ok(repo) => repo,
        Err(e) => {
            debug!(root = %root.display(), error = %e, "no git repository");
            return None;
        }
    };
    let head = repo.head().ok()?;
    head.target().map(|oid| oid.to_string())
}
