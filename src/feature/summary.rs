//! Condensed view of a feature subgraph for agents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::types::{FeatureSubGraph, FileKind, ReasonKind, RelevanceReason};

const TOP_REASONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub path: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hops: Option<usize>,
    pub is_bridge: bool,
    pub kind: FileKind,
    /// Heaviest reasons first; ties keep discovery order.
    pub top_reasons: Vec<RelevanceReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSummary {
    pub feature_id: String,
    pub feature_name: String,
    pub seeds: Vec<String>,
    pub keywords: Vec<String>,
    pub file_count: usize,
    pub edge_count: usize,
    pub bridge_count: usize,
    /// Seeds that survived the threshold filter.
    pub seeds_present: usize,
    pub reasons_by_type: BTreeMap<ReasonKind, usize>,
    pub files: Vec<FileSummary>,
    pub timestamp: DateTime<Utc>,
    pub tool_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
}

impl FeatureSummary {
    pub fn from_graph(graph: &FeatureSubGraph) -> Self {
        let mut reasons_by_type: BTreeMap<ReasonKind, usize> = BTreeMap::new();
        for reason in graph.files.iter().flat_map(|f| f.reasons.iter()) {
            *reasons_by_type.entry(reason.kind).or_default() += 1;
        }

        let files = graph
            .files
            .iter()
            .map(|f| {
                let mut top: Vec<RelevanceReason> = f.reasons.clone();
                top.sort_by(|a, b| b.weight.total_cmp(&a.weight));
                top.truncate(TOP_REASONS);
                FileSummary {
                    path: f.path.clone(),
                    score: f.score,
                    hops: f.hops,
                    is_bridge: f.is_bridge,
                    kind: f.kind,
                    top_reasons: top,
                }
            })
            .collect();

        Self {
            feature_id: graph.feature_id.clone(),
            feature_name: graph.feature_name.clone(),
            seeds: graph.seeds.clone(),
            keywords: graph.keywords.clone(),
            file_count: graph.files.len(),
            edge_count: graph.edge_count(),
            bridge_count: graph.bridges().count(),
            seeds_present: graph
                .seeds
                .iter()
                .filter(|s| graph.file(s).is_some())
                .count(),
            reasons_by_type,
            files,
            timestamp: graph.timestamp,
            tool_version: graph.tool_version.clone(),
            commit_hash: graph.commit_hash.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::types::FileScore;
    use chrono::Utc;

    #[test]
    fn test_top_three_reasons_by_weight() {
        let mut file = FileScore::new("a.ts", FileKind::File);
        file.add_reason(RelevanceReason::new(ReasonKind::KeywordSymbol, "s1", 1.0));
        file.add_reason(RelevanceReason::new(ReasonKind::Seed, "seed", 10.0));
        file.add_reason(RelevanceReason::new(ReasonKind::KeywordSymbol, "s2", 1.0));
        file.add_reason(RelevanceReason::new(ReasonKind::ImportedBy, "imp", 3.0));
        file.is_bridge = true;

        let graph = FeatureSubGraph {
            feature_id: "f".into(),
            feature_name: "Feature".into(),
            seeds: vec!["a.ts".into(), "missing.ts".into()],
            keywords: vec![],
            files: vec![file],
            edges: BTreeMap::new(),
            edge_types: BTreeMap::new(),
            timestamp: Utc::now(),
            commit_hash: None,
            tool_version: "0.1.0".into(),
        };

        let summary = FeatureSummary::from_graph(&graph);
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.bridge_count, 1);
        assert_eq!(summary.seeds_present, 1);
        assert_eq!(summary.reasons_by_type[&ReasonKind::KeywordSymbol], 2);

        let top: Vec<&str> = summary.files[0]
            .top_reasons
            .iter()
            .map(|r| r.detail.as_str())
            .collect();
        assert_eq!(top, vec!["seed", "imp", "s1"]);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["reasonsByType"]["keyword-symbol"], 2);
    }
}
