//! Error types for recipes-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or saving page content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Underlying I/O failure (permission denied, disk full, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse content at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The content file did not exist at the expected path.
    #[error("content file not found at {path}")]
    NotFound { path: PathBuf },
}
