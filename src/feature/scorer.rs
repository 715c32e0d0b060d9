//! Relevance scoring: independent evidence types, summed by weight.
//!
//! Structural evidence only looks one hop away from the seeds. Deeper
//! reachability is annotated by hop search but never adds to the score.

use tracing::debug;

use super::kind::infer_kind;
use super::payload::FeatureRequest;
use super::types::{FileScore, ReasonKind, RelevanceReason, ScoringWeights};
use crate::graph::{AnalyzedFile, DependencyGraph};

/// Evidence discovered by a collaborator outside import analysis
/// (call graphs, route tables, network clients).
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalEvidence {
    pub kind: ReasonKind,
    pub detail: String,
    pub source: Option<String>,
    pub target: Option<String>,
}

/// Supplies call, route and network-api evidence for a file.
///
/// Without a provider those evidence types contribute nothing.
pub trait EvidenceProvider: Send + Sync {
    fn evidence(&self, file: &AnalyzedFile, seeds: &[String]) -> Vec<ExternalEvidence>;
}

/// Evidence kinds an [`EvidenceProvider`] may report.
const EXTERNAL_KINDS: &[ReasonKind] = &[
    ReasonKind::CalledBy,
    ReasonKind::Calls,
    ReasonKind::Route,
    ReasonKind::NetworkApi,
    ReasonKind::Bridge,
];

/// Scores every analyzed file against a feature request.
pub struct RelevanceScorer<'a> {
    weights: &'a ScoringWeights,
    evidence: Option<&'a dyn EvidenceProvider>,
}

impl<'a> RelevanceScorer<'a> {
    pub fn new(weights: &'a ScoringWeights) -> Self {
        Self {
            weights,
            evidence: None,
        }
    }

    pub fn with_evidence(mut self, provider: &'a dyn EvidenceProvider) -> Self {
        self.evidence = Some(provider);
        self
    }

    /// Score all files. The result is ranked: score descending, path ascending.
    /// Files without evidence are kept with score 0.
    pub fn score_all(
        &self,
        files: &[AnalyzedFile],
        graph: &DependencyGraph,
        request: &FeatureRequest,
    ) -> Vec<FileScore> {
        let keywords = request.match_keywords();
        let mut scores: Vec<FileScore> = files
            .iter()
            .map(|file| self.score_file(file, graph, request, &keywords))
            .collect();
        rank(&mut scores);

        debug!(
            files = scores.len(),
            with_evidence = scores.iter().filter(|s| !s.reasons.is_empty()).count(),
            "scored files"
        );
        scores
    }

    /// Score one file. `keywords` must be lower-case.
    pub fn score_file(
        &self,
        file: &AnalyzedFile,
        graph: &DependencyGraph,
        request: &FeatureRequest,
        keywords: &[String],
    ) -> FileScore {
        let w = self.weights;
        let mut score = FileScore::new(&file.path, infer_kind(&file.path));

        if request.seeds.iter().any(|s| s == &file.path) {
            score.add_reason(RelevanceReason::new(ReasonKind::Seed, "seed file", w.seed));
        }

        for seed in &request.seeds {
            if seed == &file.path {
                continue;
            }
            if graph.imports(&file.path, seed) {
                score.add_reason(
                    RelevanceReason::new(ReasonKind::Import, format!("imports seed {}", seed), w.import)
                        .between(&file.path, seed),
                );
            }
            if graph.imports(seed, &file.path) {
                score.add_reason(
                    RelevanceReason::new(
                        ReasonKind::ImportedBy,
                        format!("imported by seed {}", seed),
                        w.imported_by,
                    )
                    .between(seed, &file.path),
                );
            }
        }

        if !keywords.is_empty() {
            let name = file.base_name().to_lowercase();
            let content = file.content.to_lowercase();
            for keyword in keywords {
                self.keyword_evidence(&mut score, file, &name, &content, keyword);
            }
        }

        if let Some(provider) = self.evidence {
            for item in provider.evidence(file, &request.seeds) {
                if !EXTERNAL_KINDS.contains(&item.kind) {
                    debug!(file = %file.path, kind = %item.kind, "ignoring external evidence kind");
                    continue;
                }
                let mut reason = RelevanceReason::new(item.kind, item.detail, w.weight(item.kind));
                reason.source = item.source;
                reason.target = item.target;
                score.add_reason(reason);
            }
        }

        score
    }

    fn keyword_evidence(
        &self,
        score: &mut FileScore,
        file: &AnalyzedFile,
        name: &str,
        content: &str,
        keyword: &str,
    ) {
        let w = self.weights;

        if name.contains(keyword) {
            score.add_reason(
                RelevanceReason::new(
                    ReasonKind::KeywordName,
                    format!("file name contains '{}'", keyword),
                    w.keyword_name,
                )
                .keyword(keyword, 1),
            );
        }

        let count = content.matches(keyword).count();
        if count > 0 {
            score.add_reason(
                RelevanceReason::new(
                    ReasonKind::KeywordText,
                    format!("'{}' appears {} time(s) in content", keyword, count),
                    w.keyword_text * count as f64,
                )
                .keyword(keyword, count),
            );
        }

        for symbol in &file.exports {
            if symbol.to_lowercase().contains(keyword) {
                score.add_reason(
                    RelevanceReason::new(
                        ReasonKind::KeywordSymbol,
                        format!("exports {} matching '{}'", symbol, keyword),
                        w.keyword_symbol,
                    )
                    .keyword(keyword, 1),
                );
            }
        }
    }
}

/// Order by score descending, ties by path ascending.
pub fn rank(scores: &mut [FileScore]) {
    scores.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.path.cmp(&b.path)));
}
