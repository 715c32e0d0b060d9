//! Feature engine: the full pipeline from payload to subgraph.
//!
//! validate → build graph → score → hop search → filter → edges → bridges → stamp.
//! Upstream file collection and downstream rendering are collaborators; the
//! engine itself never touches the filesystem.

use std::sync::Arc;
use tracing::{info, warn};

use super::assembler::assemble;
use super::hops::{apply_hops, compute_hops, CancelFlag};
use super::payload::{FeatureDefaults, FeaturePayload, FeatureRequest};
use super::scorer::{EvidenceProvider, RelevanceScorer};
use super::stamp::Stamp;
use super::summary::FeatureSummary;
use super::types::{FeatureSubGraph, FileScore, ScoringWeights};
use crate::error::{FeatureLensError, Result};
use crate::graph::{AnalyzedFile, DependencyGraph};
use crate::render::RenderTarget;

/// Outcome of [`FeatureEngine::run`].
#[derive(Debug)]
pub struct FeatureRun {
    pub summary: FeatureSummary,
    /// The assembled graph, present only when the payload set `returnGraph`.
    pub graph: Option<FeatureSubGraph>,
    /// Set when the subgraph was built but the render target rejected it.
    pub render_error: Option<FeatureLensError>,
}

impl FeatureRun {
    pub fn rendered(&self) -> bool {
        self.render_error.is_none()
    }
}

#[derive(Clone, Default)]
pub struct FeatureEngine {
    weights: ScoringWeights,
    defaults: FeatureDefaults,
    evidence: Option<Arc<dyn EvidenceProvider>>,
    cancel: Option<CancelFlag>,
}

impl FeatureEngine {
    pub fn new(weights: ScoringWeights, defaults: FeatureDefaults) -> Self {
        Self {
            weights,
            defaults,
            evidence: None,
            cancel: None,
        }
    }

    /// Attach a provider of call, route and network-api evidence.
    pub fn with_evidence(mut self, provider: Arc<dyn EvidenceProvider>) -> Self {
        self.evidence = Some(provider);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Validate the payload against this engine's defaults and weights.
    pub fn request(&self, payload: &FeaturePayload) -> Result<FeatureRequest> {
        if let Some(kind) = self.weights.invalid_entry() {
            return Err(FeatureLensError::Config(format!(
                "weight for '{}' must be a non-negative number",
                kind
            )));
        }
        payload.validate(&self.defaults)
    }

    /// Every analyzed file, scored and hop-annotated, before the threshold cut.
    pub fn score(&self, files: &[AnalyzedFile], payload: &FeaturePayload) -> Result<Vec<FileScore>> {
        let request = self.request(payload)?;
        let graph = DependencyGraph::build(files);
        self.score_request(files, &graph, &request)
    }

    fn score_request(
        &self,
        files: &[AnalyzedFile],
        graph: &DependencyGraph,
        request: &FeatureRequest,
    ) -> Result<Vec<FileScore>> {
        let mut scorer = RelevanceScorer::new(&self.weights);
        if let Some(provider) = &self.evidence {
            scorer = scorer.with_evidence(provider.as_ref());
        }
        let mut scores = scorer.score_all(files, graph, request);

        let hops = compute_hops(graph, &request.seeds, request.max_hops, self.cancel.as_ref())?;
        apply_hops(&mut scores, &hops);
        Ok(scores)
    }

    /// Build the feature subgraph for `payload` over `files`.
    pub fn analyze(
        &self,
        files: &[AnalyzedFile],
        payload: &FeaturePayload,
        stamp: &Stamp,
    ) -> Result<FeatureSubGraph> {
        let request = self.request(payload)?;
        info!(
            feature = %request.feature_id,
            seeds = request.seeds.len(),
            keywords = request.keywords.len(),
            files = files.len(),
            max_hops = request.max_hops,
            threshold = request.relevance_threshold,
            "analyzing feature"
        );

        let graph = DependencyGraph::build(files);
        let scores = self.score_request(files, &graph, &request)?;
        let (subgraph, _) = assemble(&request, scores, &graph, stamp);

        info!(
            feature = %subgraph.feature_id,
            files = subgraph.files.len(),
            edges = subgraph.edge_count(),
            bridges = subgraph.bridges().count(),
            "feature subgraph assembled"
        );
        Ok(subgraph)
    }

    /// Analyze, hand the result to `render`, and return it when requested.
    ///
    /// A render failure does not fail the run: the subgraph stays valid and
    /// the failure is reported in [`FeatureRun::render_error`].
    pub fn run(
        &self,
        files: &[AnalyzedFile],
        payload: &FeaturePayload,
        stamp: &Stamp,
        render: &dyn RenderTarget,
    ) -> Result<FeatureRun> {
        let graph = self.analyze(files, payload, stamp)?;

        let render_error = match render.render(&graph) {
            Ok(()) => None,
            Err(e) => {
                warn!(feature = %graph.feature_id, error = %e, "render target failed");
                Some(e)
            }
        };

        let summary = FeatureSummary::from_graph(&graph);
        Ok(FeatureRun {
            summary,
            graph: payload.return_graph.then_some(graph),
            render_error,
        })
    }
}
