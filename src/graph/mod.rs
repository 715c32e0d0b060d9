//! Dependency graph: the structural backbone of FeatureLens.
//!
//! Provides the analyzed-file model, the directed import graph, and the
//! project builder that collects and analyzes files under a root.

pub mod builder;
pub mod engine;
pub mod types;

pub use builder::{
    analyze_project, analyze_sources, collect_files, AnalysisReport, AnalysisWarning, SourceFile,
};
pub use engine::DependencyGraph;
pub use types::{base_name, edge_key, AnalyzedFile, EdgeKind, GraphStats};
