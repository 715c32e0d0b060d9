//! Source analysis: import and export extraction.
//!
//! The [`SourceAnalyzer`] trait is the seam between file collection and the
//! scoring engine. [`TreeSitterAnalyzer`] is the built-in implementation; any
//! other analyzer emitting the same raw specifiers and export names can be
//! swapped in without touching the graph or the scorer.

pub mod javascript;
pub mod language;
pub mod python;
pub mod resolve;
pub mod rust;

use std::collections::HashSet;
use std::path::Path;

use tree_sitter::Parser;

use crate::error::{FeatureLensError, Result};

pub use language::SupportedLanguage;
pub use resolve::{normalize_path, resolve_import};

/// Raw extraction result for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtraction {
    /// Import specifiers as written in the source (`./session`, `.db`, `graph`).
    pub imports: Vec<String>,
    /// Exported identifier names.
    pub exports: Vec<String>,
}

/// Pluggable import/export extraction.
pub trait SourceAnalyzer: Send + Sync {
    /// Whether this analyzer understands the file at `path`.
    fn supports(&self, path: &Path) -> bool;

    /// Raw import specifiers in source order.
    fn extract_imports(&self, path: &Path, source: &str) -> Result<Vec<String>>;

    /// Exported symbol names.
    fn extract_exports(&self, path: &Path, source: &str) -> Result<Vec<String>>;

    /// Both at once. Override when a single parse can serve both.
    fn extract(&self, path: &Path, source: &str) -> Result<FileExtraction> {
        Ok(FileExtraction {
            imports: self.extract_imports(path, source)?,
            exports: self.extract_exports(path, source)?,
        })
    }

    /// Map a raw specifier written in `importer` to an in-scope path.
    fn resolve(&self, importer: &str, spec: &str, known: &HashSet<String>) -> Option<String> {
        resolve_import(importer, spec, known)
    }
}

/// AST-based analyzer for Rust, Python, JavaScript, TypeScript and TSX.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterAnalyzer;

impl TreeSitterAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl SourceAnalyzer for TreeSitterAnalyzer {
    fn supports(&self, path: &Path) -> bool {
        SupportedLanguage::from_path(path).is_some()
    }

    fn extract_imports(&self, path: &Path, source: &str) -> Result<Vec<String>> {
        Ok(extract_file(path, source)?.imports)
    }

    fn extract_exports(&self, path: &Path, source: &str) -> Result<Vec<String>> {
        Ok(extract_file(path, source)?.exports)
    }

    fn extract(&self, path: &Path, source: &str) -> Result<FileExtraction> {
        extract_file(path, source)
    }
}

/// Parse `source` with the grammar matching `path` and extract imports/exports.
///
/// Malformed syntax is not an error: tree-sitter recovers and whatever
/// well-formed statements remain are still extracted.
pub fn extract_file(path: &Path, source: &str) -> Result<FileExtraction> {
    let lang = SupportedLanguage::from_path(path)
        .ok_or_else(|| FeatureLensError::UnsupportedLanguage(path.display().to_string()))?;

    let mut parser = Parser::new();
    parser
        .set_language(&lang.tree_sitter_language())
        .map_err(|e| FeatureLensError::Parse(format!("{}: {}", lang.name(), e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| FeatureLensError::Parse(format!("{}: parser returned no tree", path.display())))?;

    let root = tree.root_node();
    let bytes = source.as_bytes();
    let mut out = FileExtraction::default();

    match lang {
        SupportedLanguage::Rust => rust::extract(&root, bytes, &mut out),
        SupportedLanguage::Python => python::extract(&root, bytes, &mut out),
        SupportedLanguage::JavaScript | SupportedLanguage::TypeScript | SupportedLanguage::Tsx => {
            javascript::extract(&root, bytes, &mut out)
        }
    }

    Ok(out)
}
