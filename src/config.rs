//! Project configuration from `.featurelens/config.toml`.
//!
//! ```toml
//! [weights]
//! seed = 10.0
//! keyword_text = 0.5
//!
//! [defaults]
//! max_hops = 2
//! relevance_threshold = 12.0
//!
//! [output]
//! dir = ".featurelens/features"
//!
//! [collect]
//! exclude = ["**/vendor/**"]
//! ```
//!
//! Every section and key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{FeatureLensError, Result};
use crate::feature::{FeatureDefaults, FeatureEngine, ScoringWeights};

pub const CONFIG_DIR: &str = ".featurelens";
pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_OUTPUT_DIR: &str = ".featurelens/features";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where rendered feature graphs go, relative to the project root unless absolute.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Globs applied when a payload gives none of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectConfig {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureLensConfig {
    pub weights: ScoringWeights,
    pub defaults: FeatureDefaults,
    pub output: OutputConfig,
    pub collect: CollectConfig,
}

impl FeatureLensConfig {
    /// Path of the config file for a project root.
    pub fn path_for(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load the config for `root`, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load(root: &Path) -> Self {
        match Self::try_load(root) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "ignoring project config, using defaults");
                Self::default()
            }
        }
    }

    /// Like [`load`](Self::load) but reports malformed files and invalid values.
    pub fn try_load(root: &Path) -> Result<Self> {
        let path = Self::path_for(root);
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)?;
        let config = Self::from_toml(&text)
            .map_err(|e| FeatureLensError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| FeatureLensError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(kind) = self.weights.invalid_entry() {
            return Err(FeatureLensError::Config(format!(
                "weights.{} must be a non-negative number",
                kind.as_str().replace('-', "_")
            )));
        }
        let threshold = self.defaults.relevance_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(FeatureLensError::Config(
                "defaults.relevance_threshold must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Output directory resolved against `root`.
    pub fn resolve_output_dir(&self, root: &Path) -> PathBuf {
        if self.output.dir.is_absolute() {
            self.output.dir.clone()
        } else {
            root.join(&self.output.dir)
        }
    }

    /// Payload globs when given, otherwise the configured ones.
    pub fn collect_globs(&self, include: &[String], exclude: &[String]) -> (Vec<String>, Vec<String>) {
        let pick = |given: &[String], configured: &[String]| {
            if given.is_empty() {
                configured.to_vec()
            } else {
                given.to_vec()
            }
        };
        (
            pick(include, &self.collect.include),
            pick(exclude, &self.collect.exclude),
        )
    }

    /// Engine carrying this config's weights and defaults.
    pub fn engine(&self) -> FeatureEngine {
        FeatureEngine::new(self.weights, self.defaults)
    }
}
