//! Scoring and output types for feature analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::graph::EdgeKind;

/// The kind of evidence behind a relevance reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonKind {
    /// The file is one of the feature's seeds.
    Seed,
    /// The file imports a seed.
    Import,
    /// The file is imported by a seed.
    ImportedBy,
    /// The file is called by a seed.
    CalledBy,
    /// The file calls into a seed.
    Calls,
    /// The file declares or handles a route tied to the feature.
    Route,
    /// A keyword appears in the file's base name.
    KeywordName,
    /// A keyword appears in the file's content.
    KeywordText,
    /// A keyword appears in an exported symbol name.
    KeywordSymbol,
    /// The file links otherwise separate parts of the subgraph.
    Bridge,
    /// The file talks to an API another relevant file serves.
    NetworkApi,
}

impl ReasonKind {
    pub const ALL: [ReasonKind; 11] = [
        ReasonKind::Seed,
        ReasonKind::Import,
        ReasonKind::ImportedBy,
        ReasonKind::CalledBy,
        ReasonKind::Calls,
        ReasonKind::Route,
        ReasonKind::KeywordName,
        ReasonKind::KeywordText,
        ReasonKind::KeywordSymbol,
        ReasonKind::Bridge,
        ReasonKind::NetworkApi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonKind::Seed => "seed",
            ReasonKind::Import => "import",
            ReasonKind::ImportedBy => "imported-by",
            ReasonKind::CalledBy => "called-by",
            ReasonKind::Calls => "calls",
            ReasonKind::Route => "route",
            ReasonKind::KeywordName => "keyword-name",
            ReasonKind::KeywordText => "keyword-text",
            ReasonKind::KeywordSymbol => "keyword-symbol",
            ReasonKind::Bridge => "bridge",
            ReasonKind::NetworkApi => "network-api",
        }
    }
}

impl fmt::Display for ReasonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of evidence that a file belongs to a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevanceReason {
    #[serde(rename = "type")]
    pub kind: ReasonKind,
    pub detail: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
}

impl RelevanceReason {
    pub fn new(kind: ReasonKind, detail: impl Into<String>, weight: f64) -> Self {
        Self {
            kind,
            detail: detail.into(),
            weight,
            source: None,
            target: None,
            matched_keyword: None,
            match_count: None,
        }
    }

    /// Relational evidence between two files.
    pub fn between(mut self, source: &str, target: &str) -> Self {
        self.source = Some(source.to_string());
        self.target = Some(target.to_string());
        self
    }

    /// Textual evidence for a keyword.
    pub fn keyword(mut self, keyword: &str, count: usize) -> Self {
        self.matched_keyword = Some(keyword.to_string());
        self.match_count = Some(count);
        self
    }
}

/// Best-effort role of a file, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Component,
    Service,
    Route,
    Config,
    Test,
    Model,
    Hook,
    Util,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::File => write!(f, "file"),
            FileKind::Component => write!(f, "component"),
            FileKind::Service => write!(f, "service"),
            FileKind::Route => write!(f, "route"),
            FileKind::Config => write!(f, "config"),
            FileKind::Test => write!(f, "test"),
            FileKind::Model => write!(f, "model"),
            FileKind::Hook => write!(f, "hook"),
            FileKind::Util => write!(f, "util"),
        }
    }
}

/// Relevance of one file to a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileScore {
    pub path: String,
    /// Unbounded weighted sum of `reasons`.
    pub score: f64,
    /// Evidence in discovery order.
    pub reasons: Vec<RelevanceReason>,
    pub kind: FileKind,
    /// Distance from the nearest seed; `None` when not reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hops: Option<usize>,
    #[serde(default)]
    pub is_bridge: bool,
}

impl FileScore {
    pub fn new(path: impl Into<String>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            score: 0.0,
            reasons: Vec::new(),
            kind,
            hops: None,
            is_bridge: false,
        }
    }

    /// Append evidence and accumulate its weight.
    pub fn add_reason(&mut self, reason: RelevanceReason) {
        self.score += reason.weight;
        self.reasons.push(reason);
    }

    pub fn has_reason(&self, kind: ReasonKind) -> bool {
        self.reasons.iter().any(|r| r.kind == kind)
    }
}

/// Weight of each evidence type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub seed: f64,
    pub import: f64,
    pub imported_by: f64,
    pub called_by: f64,
    pub calls: f64,
    pub route: f64,
    pub keyword_name: f64,
    pub keyword_text: f64,
    pub keyword_symbol: f64,
    pub bridge: f64,
    pub network_api: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            seed: 10.0,
            import: 3.0,
            imported_by: 3.0,
            called_by: 4.0,
            calls: 4.0,
            route: 4.0,
            keyword_name: 2.0,
            keyword_text: 1.0,
            keyword_symbol: 1.0,
            bridge: 2.0,
            network_api: 3.0,
        }
    }
}

impl ScoringWeights {
    pub fn weight(&self, kind: ReasonKind) -> f64 {
        match kind {
            ReasonKind::Seed => self.seed,
            ReasonKind::Import => self.import,
            ReasonKind::ImportedBy => self.imported_by,
            ReasonKind::CalledBy => self.called_by,
            ReasonKind::Calls => self.calls,
            ReasonKind::Route => self.route,
            ReasonKind::KeywordName => self.keyword_name,
            ReasonKind::KeywordText => self.keyword_text,
            ReasonKind::KeywordSymbol => self.keyword_symbol,
            ReasonKind::Bridge => self.bridge,
            ReasonKind::NetworkApi => self.network_api,
        }
    }

    /// First weight that is negative or not finite, if any.
    pub fn invalid_entry(&self) -> Option<ReasonKind> {
        ReasonKind::ALL
            .into_iter()
            .find(|&k| !self.weight(k).is_finite() || self.weight(k) < 0.0)
    }
}

/// The scored, hop-annotated subgraph for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSubGraph {
    pub feature_id: String,
    pub feature_name: String,
    pub seeds: Vec<String>,
    pub keywords: Vec<String>,
    /// Files at or above the threshold: score descending, then path ascending.
    pub files: Vec<FileScore>,
    /// Directed import edges among `files` only.
    pub edges: BTreeMap<String, Vec<String>>,
    /// `"from->to"` -> edge kind, one entry per edge in `edges`.
    pub edge_types: BTreeMap<String, EdgeKind>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    pub tool_version: String,
}

impl FeatureSubGraph {
    pub fn file(&self, path: &str) -> Option<&FileScore> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn bridges(&self) -> impl Iterator<Item = &FileScore> {
        self.files.iter().filter(|f| f.is_bridge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = ScoringWeights::default();
        assert_eq!(w.weight(ReasonKind::Seed), 10.0);
        assert_eq!(w.weight(ReasonKind::Import), 3.0);
        assert_eq!(w.weight(ReasonKind::ImportedBy), 3.0);
        assert_eq!(w.weight(ReasonKind::CalledBy), 4.0);
        assert_eq!(w.weight(ReasonKind::KeywordName), 2.0);
        assert_eq!(w.weight(ReasonKind::KeywordText), 1.0);
        assert_eq!(w.weight(ReasonKind::NetworkApi), 3.0);
        assert_eq!(w.invalid_entry(), None);
    }

    #[test]
    fn test_invalid_weight_detected() {
        let w = ScoringWeights {
            bridge: -1.0,
            ..Default::default()
        };
        assert_eq!(w.invalid_entry(), Some(ReasonKind::Bridge));
    }

    #[test]
    fn test_reason_serializes_with_type_tag() {
        let reason = RelevanceReason::new(ReasonKind::ImportedBy, "imported by a.ts", 3.0)
            .between("a.ts", "util.ts");
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["type"], "imported-by");
        assert_eq!(json["source"], "a.ts");
        assert!(json.get("matchedKeyword").is_none());
    }

    #[test]
    fn test_file_score_accumulates() {
        let mut score = FileScore::new("a.ts", FileKind::File);
        score.add_reason(RelevanceReason::new(ReasonKind::Seed, "seed", 10.0));
        score.add_reason(RelevanceReason::new(ReasonKind::KeywordText, "text", 2.0).keyword("auth", 2));
        assert_eq!(score.score, 12.0);
        assert!(score.has_reason(ReasonKind::Seed));
        assert!(!score.has_reason(ReasonKind::Bridge));
        let json = serde_json::to_value(&score).unwrap();
        assert!(json.get("hops").is_none());
        assert_eq!(json["isBridge"], false);
    }
}
