//! Feature request input and its validation.

use serde::{Deserialize, Serialize};

use crate::error::{FeatureLensError, Result};
use crate::parser::normalize_path;

pub const DEFAULT_MAX_HOPS: usize = 3;
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 30.0;

/// A feature request as supplied by a person or an agent.
///
/// `include_globs`/`exclude_globs` steer file collection upstream; the
/// engine itself never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePayload {
    #[serde(default)]
    pub feature_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_name: Option<String>,
    #[serde(default)]
    pub seeds: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hops: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_threshold: Option<f64>,
    #[serde(default)]
    pub return_graph: bool,
}

/// Fallbacks for options the payload leaves unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureDefaults {
    pub max_hops: usize,
    pub relevance_threshold: f64,
}

impl Default for FeatureDefaults {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }
}

/// A validated feature request with every option resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRequest {
    pub feature_id: String,
    pub feature_name: String,
    /// Normalised, de-duplicated, in payload order.
    pub seeds: Vec<String>,
    /// Trimmed, de-duplicated (case-insensitively), as written.
    pub keywords: Vec<String>,
    pub max_hops: usize,
    pub relevance_threshold: f64,
    pub return_graph: bool,
}

impl FeatureRequest {
    /// Lower-cased keywords for case-insensitive matching, same order as `keywords`.
    pub fn match_keywords(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.to_lowercase()).collect()
    }
}

impl FeaturePayload {
    pub fn new(feature_id: impl Into<String>, seeds: Vec<String>) -> Self {
        Self {
            feature_id: feature_id.into(),
            seeds,
            ..Default::default()
        }
    }

    /// Reject malformed requests before any work is done, and resolve defaults.
    pub fn validate(&self, defaults: &FeatureDefaults) -> Result<FeatureRequest> {
        let feature_id = self.feature_id.trim();
        if feature_id.is_empty() {
            return Err(FeatureLensError::InvalidPayload(
                "featureId is required".to_string(),
            ));
        }

        let mut seeds: Vec<String> = Vec::with_capacity(self.seeds.len());
        for seed in &self.seeds {
            let seed = normalize_path(seed);
            if !seed.is_empty() && !seeds.contains(&seed) {
                seeds.push(seed);
            }
        }
        if seeds.is_empty() {
            return Err(FeatureLensError::InvalidPayload(
                "at least one seed file is required".to_string(),
            ));
        }

        let relevance_threshold = self
            .relevance_threshold
            .unwrap_or(defaults.relevance_threshold);
        if !relevance_threshold.is_finite() || relevance_threshold < 0.0 {
            return Err(FeatureLensError::InvalidPayload(format!(
                "relevanceThreshold must be a non-negative number, got {}",
                relevance_threshold
            )));
        }

        let mut keywords: Vec<String> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for keyword in &self.keywords {
            let trimmed = keyword.trim();
            let lower = trimmed.to_lowercase();
            if trimmed.is_empty() || seen.contains(&lower) {
                continue;
            }
            seen.push(lower);
            keywords.push(trimmed.to_string());
        }

        let feature_name = self
            .feature_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(feature_id)
            .to_string();

        Ok(FeatureRequest {
            feature_id: feature_id.to_string(),
            feature_name,
            seeds,
            keywords,
            max_hops: self.max_hops.unwrap_or(defaults.max_hops),
            relevance_threshold,
            return_graph: self.return_graph,
        })
    }
}
