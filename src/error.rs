//! Error types for FeatureLens.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeatureLensError>;

#[derive(Error, Debug)]
pub enum FeatureLensError {
    /// The feature request was rejected before any work was done.
    #[error("Invalid feature payload: {0}")]
    InvalidPayload(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Analysis cancelled")]
    Cancelled,

    /// The scored subgraph was built, but handing it to the render target failed.
    #[error("Render failed: {0}")]
    Render(String),
}

impl FeatureLensError {
    /// Render failures happen after a valid subgraph exists and must not be
    /// reported as analysis failures.
    pub fn is_render_failure(&self) -> bool {
        matches!(self, FeatureLensError::Render(_))
    }
}
