//! Error types for recipes-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A name referenced by the template has no binding in the render context.
    #[error("missing binding `{name}` in render context")]
    MissingBinding { name: String },

    /// An included partial could not be located by the page's chunk source.
    #[error("partial not found: {name}")]
    PartialNotFound { name: String },

    /// Tera template engine error (syntax, unknown template, bad filter use).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (building tera context).
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while loading user templates or reading partials.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}
