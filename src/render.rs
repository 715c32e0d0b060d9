//! Hand-off of assembled subgraphs to a render target.
//!
//! Layout, positions and annotations belong to the target; the engine only
//! guarantees nodes, typed edges and per-node metadata.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{FeatureLensError, Result};
use crate::feature::{FeatureSubGraph, FileKind, RelevanceReason};
use crate::graph::{base_name, EdgeKind};

/// Consumer of assembled subgraphs.
pub trait RenderTarget {
    fn render(&self, graph: &FeatureSubGraph) -> Result<()>;
}

/// Node as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hops: Option<usize>,
    pub is_bridge: bool,
    pub kind: FileKind,
    pub reasons: Vec<RelevanceReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Nodes plus typed edges: everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDocument {
    pub feature_id: String,
    pub feature_name: String,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderDocument {
    pub fn from_graph(graph: &FeatureSubGraph) -> Self {
        let nodes = graph
            .files
            .iter()
            .map(|f| RenderNode {
                id: f.path.clone(),
                label: base_name(&f.path).to_string(),
                score: f.score,
                hops: f.hops,
                is_bridge: f.is_bridge,
                kind: f.kind,
                reasons: f.reasons.clone(),
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .flat_map(|(from, tos)| {
                tos.iter().map(move |to| RenderEdge {
                    from: from.clone(),
                    to: to.clone(),
                    kind: graph
                        .edge_types
                        .get(&crate::graph::edge_key(from, to))
                        .copied()
                        .unwrap_or(EdgeKind::Import),
                })
            })
            .collect();

        Self {
            feature_id: graph.feature_id.clone(),
            feature_name: graph.feature_name.clone(),
            nodes,
            edges,
        }
    }
}

/// Writes `<dir>/<featureId>.json` for an external viewer to pick up.
#[derive(Debug, Clone)]
pub struct JsonFileRender {
    dir: PathBuf,
}

impl JsonFileRender {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the document for `feature_id` is written.
    pub fn output_path(&self, feature_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(feature_id)))
    }

    fn write(&self, path: &Path, graph: &FeatureSubGraph) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let document = RenderDocument::from_graph(graph);
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(path, json)
    }
}

impl RenderTarget for JsonFileRender {
    fn render(&self, graph: &FeatureSubGraph) -> Result<()> {
        let path = self.output_path(&graph.feature_id);
        self.write(&path, graph)
            .map_err(|e| FeatureLensError::Render(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), nodes = graph.files.len(), "feature graph written");
        Ok(())
    }
}

/// Discards the graph. Used when the caller only wants the returned value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRender;

impl RenderTarget for NullRender {
    fn render(&self, _graph: &FeatureSubGraph) -> Result<()> {
        Ok(())
    }
}

/// Feature ids may contain anything; file names may not.
///
/// Ids that are already safe are used as is. Others are sanitized and
/// suffixed with a digest of the raw id, so `a/b` and `a_b` stay apart.
fn file_stem(feature_id: &str) -> String {
    let is_safe = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    if !feature_id.is_empty() && feature_id.chars().all(is_safe) {
        return feature_id.to_string();
    }

    let sanitized: String = feature_id
        .chars()
        .map(|c| if is_safe(c) { c } else { '_' })
        .collect();
    let digest = Sha256::digest(feature_id.as_bytes());
    let suffix: String = digest[..4].iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}-{}", sanitized, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FileScore, RelevanceReason, ReasonKind};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample() -> FeatureSubGraph {
        let mut login = FileScore::new("src/login.ts", FileKind::File);
        login.add_reason(RelevanceReason::new(ReasonKind::Seed, "seed file", 10.0));
        login.hops = Some(0);
        let session = FileScore::new("src/session.ts", FileKind::File);

        let mut edges = BTreeMap::new();
        edges.insert("src/login.ts".to_string(), vec!["src/session.ts".to_string()]);
        let mut edge_types = BTreeMap::new();
        edge_types.insert("src/login.ts->src/session.ts".to_string(), EdgeKind::Import);

        FeatureSubGraph {
            feature_id: "auth/login flow".into(),
            feature_name: "Login".into(),
            seeds: vec!["src/login.ts".into()],
            keywords: vec![],
            files: vec![login, session],
            edges,
            edge_types,
            timestamp: Utc::now(),
            commit_hash: None,
            tool_version: "0.1.0".into(),
        }
    }

    #[test]
    fn test_document_shape() {
        let doc = RenderDocument::from_graph(&sample());
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0].label, "login.ts");
        assert_eq!(doc.edges.len(), 1);
        assert_eq!(doc.edges[0].kind, EdgeKind::Import);
        assert_eq!(doc.edges[0].to, "src/session.ts");
    }

    #[test]
    fn test_json_file_render_writes_document() {
        let dir = TempDir::new().unwrap();
        let render = JsonFileRender::new(dir.path().join("features"));
        render.render(&sample()).unwrap();

        let path = render.output_path("auth/login flow");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("auth_login_flow-"), "{}", name);
        assert!(path.exists());
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["featureId"], "auth/login flow");
        assert_eq!(written["nodes"][0]["isBridge"], false);
        assert_eq!(written["edges"][0]["kind"], "import");
    }

    #[test]
    fn test_distinct_ids_never_share_a_file() {
        let render = JsonFileRender::new("out");
        let slash = render.output_path("a/b");
        let underscore = render.output_path("a_b");
        assert_ne!(slash, underscore);
        assert_eq!(underscore, Path::new("out").join("a_b.json"));
        assert_eq!(slash, render.output_path("a/b"));
        assert_ne!(render.output_path("a b"), slash);

        let dir = TempDir::new().unwrap();
        let render = JsonFileRender::new(dir.path());
        let mut first = sample();
        first.feature_id = "a/b".into();
        let mut second = sample();
        second.feature_id = "a_b".into();
        render.render(&first).unwrap();
        render.render(&second).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_unwritable_target_is_render_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let render = JsonFileRender::new(&blocker);
        let err = render.render(&sample()).unwrap_err();
        assert!(err.is_render_failure());
    }
}
