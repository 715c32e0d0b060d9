//! Subgraph assembly: threshold filter, induced edges, bridges, stamp.

use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::bridge::{apply_bridges, detect_bridges, BridgeReport};
use super::payload::FeatureRequest;
use super::stamp::Stamp;
use super::types::{FeatureSubGraph, FileScore};
use crate::graph::{edge_key, DependencyGraph, EdgeKind};

/// Keep scores at or above `threshold`, preserving their order.
pub fn filter_by_threshold(scores: Vec<FileScore>, threshold: f64) -> Vec<FileScore> {
    scores.into_iter().filter(|s| s.score >= threshold).collect()
}

/// Directed import edges whose both endpoints are in `files`.
///
/// Keys and targets are sorted; files without outgoing edges get no entry.
pub fn induced_edges(graph: &DependencyGraph, files: &[FileScore]) -> BTreeMap<String, Vec<String>> {
    let kept: HashSet<&str> = files.iter().map(|f| f.path.as_str()).collect();
    let mut edges = BTreeMap::new();
    for file in files {
        let targets: Vec<String> = graph
            .imports_of(&file.path)
            .into_iter()
            .filter(|t| kept.contains(t))
            .map(String::from)
            .collect();
        if !targets.is_empty() {
            edges.insert(file.path.clone(), targets);
        }
    }
    edges
}

/// Build the final subgraph from ranked, hop-annotated scores.
pub fn assemble(
    request: &FeatureRequest,
    scores: Vec<FileScore>,
    graph: &DependencyGraph,
    stamp: &Stamp,
) -> (FeatureSubGraph, BridgeReport) {
    let total = scores.len();
    let mut files = filter_by_threshold(scores, request.relevance_threshold);
    let edges = induced_edges(graph, &files);

    let edge_types: BTreeMap<String, EdgeKind> = edges
        .iter()
        .flat_map(|(from, tos)| tos.iter().map(move |to| (edge_key(from, to), EdgeKind::Import)))
        .collect();

    let paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
    let bridges = detect_bridges(&paths, &edges);
    apply_bridges(&mut files, &bridges);

    debug!(
        feature = %request.feature_id,
        kept = files.len(),
        dropped = total - files.len(),
        edges = edge_types.len(),
        bridges = bridges.bridges.len(),
        "subgraph assembled"
    );

    let subgraph = FeatureSubGraph {
        feature_id: request.feature_id.clone(),
        feature_name: request.feature_name.clone(),
        seeds: request.seeds.clone(),
        keywords: request.keywords.clone(),
        files,
        edges,
        edge_types,
        timestamp: stamp.timestamp,
        commit_hash: stamp.commit_hash.clone(),
        tool_version: stamp.tool_version.clone(),
    };
    (subgraph, bridges)
}
