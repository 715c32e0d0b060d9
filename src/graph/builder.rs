//! Project builder: scans a directory and produces analyzed file records.
//!
//! Walks source files respecting .gitignore and the include/exclude globs,
//! reads and parses each in parallel, and resolves imports against the set
//! of files that were analyzed successfully.

use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::engine::DependencyGraph;
use super::types::AnalyzedFile;
use crate::error::{FeatureLensError, Result};
use crate::parser::SourceAnalyzer;

/// A source file held in memory before analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// A file that was skipped during collection or analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub path: String,
    pub message: String,
}

/// Output of the upstream analysis stage.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    /// Successfully analyzed files, sorted by path, `imported_by` filled.
    pub files: Vec<AnalyzedFile>,
    /// Files that were skipped, sorted by path.
    pub warnings: Vec<AnalysisWarning>,
}

/// List analyzable files under `root` as sorted root-relative `/` paths.
///
/// `include` globs whitelist (when non-empty), `exclude` globs blacklist.
pub fn collect_files(
    root: &Path,
    analyzer: &dyn SourceAnalyzer,
    include: &[String],
    exclude: &[String],
) -> Result<Vec<String>> {
    let mut overrides = OverrideBuilder::new(root);
    for glob in include {
        overrides
            .add(glob)
            .map_err(|e| FeatureLensError::Config(format!("include glob '{}': {}", glob, e)))?;
    }
    for glob in exclude {
        overrides
            .add(&format!("!{}", glob))
            .map_err(|e| FeatureLensError::Config(format!("exclude glob '{}': {}", glob, e)))?;
    }
    let overrides = overrides
        .build()
        .map_err(|e| FeatureLensError::Config(e.to_string()))?;

    let mut files: Vec<String> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .overrides(overrides)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| analyzer.supports(entry.path()))
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        })
        .collect();

    files.sort();
    debug!(root = %root.display(), files = files.len(), "collected source files");
    Ok(files)
}

/// Collect, read and analyze every supported file under `root`.
///
/// Unreadable or unparsable files are skipped and reported as warnings.
pub fn analyze_project(
    root: &Path,
    analyzer: &dyn SourceAnalyzer,
    include: &[String],
    exclude: &[String],
) -> Result<AnalysisReport> {
    let paths = collect_files(root, analyzer, include, exclude)?;

    let read: Vec<std::result::Result<SourceFile, AnalysisWarning>> = paths
        .par_iter()
        .map(|rel| match fs::read_to_string(root.join(rel)) {
            Ok(content) => Ok(SourceFile::new(rel.clone(), content)),
            Err(e) => Err(AnalysisWarning {
                path: rel.clone(),
                message: format!("read failed: {}", e),
            }),
        })
        .collect();

    let mut sources = Vec::with_capacity(read.len());
    let mut read_warnings = Vec::new();
    for item in read {
        match item {
            Ok(source) => sources.push(source),
            Err(warning) => {
                warn!(file = %warning.path, error = %warning.message, "skipping file");
                read_warnings.push(warning);
            }
        }
    }

    let mut report = analyze_sources(sources, analyzer);
    report.warnings.extend(read_warnings);
    report.warnings.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(report)
}

/// Analyze in-memory sources: extract, resolve imports, fill `imported_by`.
pub fn analyze_sources(sources: Vec<SourceFile>, analyzer: &dyn SourceAnalyzer) -> AnalysisReport {
    let extracted: Vec<_> = sources
        .into_par_iter()
        .map(|source| {
            let result = analyzer.extract(Path::new(&source.path), &source.content);
            (source, result)
        })
        .collect();

    let mut parsed = Vec::with_capacity(extracted.len());
    let mut warnings = Vec::new();
    for (source, result) in extracted {
        match result {
            Ok(extraction) => parsed.push((source, extraction)),
            Err(e) => {
                warn!(file = %source.path, error = %e, "skipping file");
                warnings.push(AnalysisWarning {
                    path: source.path,
                    message: e.to_string(),
                });
            }
        }
    }

    let known: HashSet<String> = parsed.iter().map(|(s, _)| s.path.clone()).collect();

    let mut files: Vec<AnalyzedFile> = parsed
        .into_iter()
        .map(|(source, extraction)| {
            let mut imports: Vec<String> = Vec::new();
            for spec in &extraction.imports {
                if let Some(target) = analyzer.resolve(&source.path, spec, &known) {
                    if !imports.contains(&target) {
                        imports.push(target);
                    }
                }
            }
            AnalyzedFile {
                path: source.path,
                content: source.content,
                imports,
                imported_by: Vec::new(),
                exports: extraction.exports,
            }
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);

    let graph = DependencyGraph::build(&files);
    graph.populate_imported_by(&mut files);

    warnings.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(
        files = files.len(),
        edges = graph.edge_count(),
        skipped = warnings.len(),
        "analysis complete"
    );

    AnalysisReport { files, warnings }
}
