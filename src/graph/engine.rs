//! The dependency graph engine.
//!
//! Uses petgraph to store file-level import relationships and answers
//! the adjacency queries the scorer, hop search and assembler need.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use super::types::*;

/// File-level dependency graph.
///
/// Edges are directed (`importer -> imported`) so the display edge type is kept,
/// while `neighbors` and `adjacency` expose the undirected view used for
/// reachability.
pub struct DependencyGraph {
    /// Nodes are root-relative file paths.
    graph: DiGraph<String, EdgeKind>,
    /// Index: file path -> node index.
    file_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            file_index: HashMap::new(),
        }
    }

    /// Build the graph from analyzed files.
    ///
    /// Imports pointing outside the analyzed set are skipped, as are
    /// self-imports. Repeated imports of the same target collapse to one edge.
    pub fn build(files: &[AnalyzedFile]) -> Self {
        let mut graph = Self::new();
        for file in files {
            graph.add_file(&file.path);
        }

        let mut skipped = 0usize;
        for file in files {
            for target in &file.imports {
                if !graph.add_import(&file.path, target) {
                    skipped += 1;
                }
            }
        }

        debug!(
            files = graph.file_count(),
            edges = graph.edge_count(),
            skipped,
            "dependency graph built"
        );
        graph
    }

    // ─── Node / Edge Operations ─────────────────────────────────

    /// Add a file node. Returns the existing index if already present.
    pub fn add_file(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.file_index.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(path.to_string());
        self.file_index.insert(path.to_string(), idx);
        idx
    }

    /// Record that `from` imports `to`. Both files must already be in the graph.
    ///
    /// Returns false when the edge was not added (unknown endpoint or self-import).
    pub fn add_import(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        let (Some(&a), Some(&b)) = (self.file_index.get(from), self.file_index.get(to)) else {
            return false;
        };
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, EdgeKind::Import);
        }
        true
    }

    // ─── Query Operations ───────────────────────────────────────

    pub fn contains(&self, path: &str) -> bool {
        self.file_index.contains_key(path)
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether `from` directly imports `to`.
    pub fn imports(&self, from: &str, to: &str) -> bool {
        match (self.file_index.get(from), self.file_index.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Files that `path` imports, sorted.
    pub fn imports_of(&self, path: &str) -> Vec<&str> {
        self.directed(path, Direction::Outgoing)
    }

    /// Files that import `path`, sorted.
    pub fn imported_by(&self, path: &str) -> Vec<&str> {
        self.directed(path, Direction::Incoming)
    }

    /// Files adjacent to `path` in either direction, sorted and de-duplicated.
    pub fn neighbors(&self, path: &str) -> Vec<&str> {
        let Some(&idx) = self.file_index.get(path) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors_undirected(idx)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Symmetric adjacency map: for every `a imports b` both `a -> b` and `b -> a`
    /// are present. Every file has an entry, possibly empty.
    pub fn adjacency(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut map: BTreeMap<String, BTreeSet<String>> = self
            .graph
            .node_weights()
            .map(|p| (p.clone(), BTreeSet::new()))
            .collect();
        for edge in self.graph.edge_references() {
            let from = &self.graph[edge.source()];
            let to = &self.graph[edge.target()];
            if let Some(set) = map.get_mut(from) {
                set.insert(to.clone());
            }
            if let Some(set) = map.get_mut(to) {
                set.insert(from.clone());
            }
        }
        map
    }

    /// All directed import edges as `(from, to)`, sorted.
    pub fn import_edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .edge_references()
            .map(|e| (self.graph[e.source()].as_str(), self.graph[e.target()].as_str()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Fill `imported_by` on each file from the reverse edges of this graph.
    pub fn populate_imported_by(&self, files: &mut [AnalyzedFile]) {
        for file in files.iter_mut() {
            file.imported_by = self
                .imported_by(&file.path)
                .into_iter()
                .map(String::from)
                .collect();
        }
    }

    pub fn stats(&self) -> GraphStats {
        let isolated_files = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph.neighbors_undirected(idx).next().is_none())
            .count();
        GraphStats {
            file_count: self.file_count(),
            edge_count: self.edge_count(),
            isolated_files,
        }
    }

    fn directed(&self, path: &str, dir: Direction) -> Vec<&str> {
        let Some(&idx) = self.file_index.get(path) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
