//! Feature relevance engine.
//!
//! Given a payload naming seed files and keywords, scores every analyzed file,
//! annotates hop distance from the seeds, keeps what clears the threshold and
//! flags bridge files in the result.

pub mod assembler;
pub mod bridge;
pub mod engine;
pub mod hops;
pub mod kind;
pub mod payload;
pub mod scorer;
pub mod stamp;
pub mod summary;
pub mod types;

pub use assembler::{assemble, filter_by_threshold, induced_edges};
pub use bridge::{apply_bridges, detect_bridges, BridgeReport, Degree};
pub use engine::{FeatureEngine, FeatureRun};
pub use hops::{apply_hops, compute_hops, CancelFlag};
pub use kind::infer_kind;
pub use payload::{
    FeatureDefaults, FeaturePayload, FeatureRequest, DEFAULT_MAX_HOPS, DEFAULT_RELEVANCE_THRESHOLD,
};
pub use scorer::{rank, EvidenceProvider, ExternalEvidence, RelevanceScorer};
pub use stamp::{read_commit_hash, Stamp, TOOL_VERSION};
pub use summary::{FeatureSummary, FileSummary};
pub use types::{FeatureSubGraph, FileKind, FileScore, ReasonKind, RelevanceReason, ScoringWeights};
