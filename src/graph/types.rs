//! Core types for the dependency graph.
//!
//! Defines the analyzed file record handed over by the source analyzer,
//! the edge kinds, and the statistics reported about a built graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One source file after import/export extraction.
///
/// `imports` only ever holds paths that exist in the analyzed set; third-party
/// and unresolvable imports are dropped by the analyzer before this record is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedFile {
    /// Root-relative path with `/` separators. Unique per file.
    pub path: String,
    /// Raw text, used for keyword matching only.
    #[serde(default, skip_serializing)]
    pub content: String,
    /// Resolved in-scope import targets, in source order.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Files importing this one. Filled by the graph builder.
    #[serde(default)]
    pub imported_by: Vec<String>,
    /// Exported symbol names.
    #[serde(default, alias = "symbols")]
    pub exports: Vec<String>,
}

impl AnalyzedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exports<I, S>(mut self, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports = exports.into_iter().map(Into::into).collect();
        self
    }

    /// Final path segment (`src/auth/login.ts` -> `login.ts`).
    pub fn base_name(&self) -> &str {
        base_name(&self.path)
    }
}

/// Final `/`-separated segment of a path.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The kind of an edge in the feature subgraph.
///
/// Only `Import` is produced today; the others are reserved for call, route
/// and network evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// File imports another file (File -> File).
    Import,
    /// Symbol in one file calls a symbol in another.
    Call,
    /// Route declaration wired to a handler file.
    Route,
    /// Client file consuming an API served by another file.
    Api,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Import => write!(f, "import"),
            EdgeKind::Call => write!(f, "call"),
            EdgeKind::Route => write!(f, "route"),
            EdgeKind::Api => write!(f, "api"),
        }
    }
}

/// Key used in `edge_types` maps: `"from->to"`.
pub fn edge_key(from: &str, to: &str) -> String {
    format!("{}->{}", from, to)
}

/// Size of a built dependency graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub file_count: usize,
    /// Directed import edges.
    pub edge_count: usize,
    /// Files with no import edge in either direction.
    pub isolated_files: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files, {} import edges, {} isolated",
            self.file_count, self.edge_count, self.isolated_files
        )
    }
}
