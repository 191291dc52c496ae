//! Build-level errors.
//!
//! Only two conditions are fatal to a build: a broken configuration
//! (including fragment templates that fail to compile) and the worker
//! pool failing to start. Everything else degrades per object and is
//! reported through warnings and stats instead.

use thiserror::Error;

use crate::config::ConfigError;
use docloom_render::RenderError;

/// Fatal build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build configuration is unsound.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A registered fragment template failed to compile.
    #[error("fragment template configuration error: {0}")]
    Template(#[from] RenderError),

    /// The render worker pool could not start.
    #[error("render worker pool failed to start: {0}")]
    PoolStart(String),

    /// The build was cancelled; partial output is discarded.
    #[error("build cancelled")]
    Cancelled,
}
