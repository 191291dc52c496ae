//! Error types for fragment rendering.

use thiserror::Error;

/// Errors raised while registering or rendering fragment templates.
///
/// Registration failures (bad template syntax) surface at registry
/// construction and are configuration defects. Render-time failures are
/// recovered per tier by the disclosure renderer and never abort a build.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template compilation or evaluation failure.
    #[error("template error: {0}")]
    Template(String),

    /// A fragment referenced a template it never registered.
    #[error("fragment \"{fragment}\" has no template for tier \"{tier}\"")]
    MissingTemplate { fragment: String, tier: String },

    /// View serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        RenderError::Template(err.to_string())
    }
}
