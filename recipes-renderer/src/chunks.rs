//! Partial sources: the `page` capability behind `render_chunk(name=...)`.
//!
//! | Source          | Resolves `name` from                                  |
//! |-----------------|-------------------------------------------------------|
//! | `StaticChunks`  | an in-memory map (embedded defaults, fakes in tests)  |
//! | `DirChunks`     | `<root>/<name>` on disk                               |
//! | `OverlayChunks` | a primary source, then a fallback on not-found        |

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use recipes_core::types::Html;

use crate::error::{io_err, RenderError};

/// Partial included before the page content.
pub const HEADER_CHUNK: &str = "partials/header.html";
/// Partial included after the page content.
pub const FOOTER_CHUNK: &str = "partials/footer.html";

const EMBEDDED_CHUNKS: &[(&str, &str)] = &[
    (HEADER_CHUNK, include_str!("templates/_partials/header.html")),
    (FOOTER_CHUNK, include_str!("templates/_partials/footer.html")),
];

/// Includes a named partial. The returned markup is spliced verbatim.
///
/// Implementations return [`RenderError::PartialNotFound`] when `name`
/// cannot be resolved.
pub trait ChunkRenderer: Send + Sync {
    fn render_chunk(&self, name: &str) -> Result<Html, RenderError>;
}

// ---------------------------------------------------------------------------
// StaticChunks
// ---------------------------------------------------------------------------

/// In-memory partials keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StaticChunks {
    chunks: HashMap<String, Html>,
}

impl StaticChunks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The header and footer partials baked into the binary.
    pub fn embedded() -> Self {
        EMBEDDED_CHUNKS
            .iter()
            .fold(Self::new(), |chunks, (name, markup)| {
                chunks.with(*name, Html::trusted(*markup))
            })
    }

    pub fn with(mut self, name: impl Into<String>, markup: Html) -> Self {
        self.insert(name, markup);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, markup: Html) {
        self.chunks.insert(name.into(), markup);
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.chunks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ChunkRenderer for StaticChunks {
    fn render_chunk(&self, name: &str) -> Result<Html, RenderError> {
        self.chunks
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::PartialNotFound { name: name.to_string() })
    }
}

// ---------------------------------------------------------------------------
// DirChunks
// ---------------------------------------------------------------------------

/// Partials read from files under a root directory.
///
/// Names are relative paths. Absolute names and names with `..` never leave
/// the root; they resolve to nothing.
#[derive(Debug, Clone)]
pub struct DirChunks {
    root: PathBuf,
}

impl DirChunks {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let rel = Path::new(name);
        if name.is_empty() || rel.is_absolute() {
            return None;
        }
        let contained = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.root.join(rel))
    }
}

impl ChunkRenderer for DirChunks {
    fn render_chunk(&self, name: &str) -> Result<Html, RenderError> {
        let not_found = || RenderError::PartialNotFound { name: name.to_string() };
        let path = self.resolve(name).ok_or_else(not_found)?;
        match std::fs::read_to_string(&path) {
            Ok(markup) => {
                tracing::debug!("read partial {name} from {}", path.display());
                Ok(Html::trusted(markup))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(io_err(path, e)),
        }
    }
}

// ---------------------------------------------------------------------------
// OverlayChunks
// ---------------------------------------------------------------------------

/// Looks a partial up in `primary` first and in `fallback` when the primary
/// does not have it. Any other primary error is returned unchanged.
#[derive(Clone)]
pub struct OverlayChunks {
    primary: Arc<dyn ChunkRenderer>,
    fallback: Arc<dyn ChunkRenderer>,
}

impl OverlayChunks {
    pub fn new(primary: Arc<dyn ChunkRenderer>, fallback: Arc<dyn ChunkRenderer>) -> Self {
        Self { primary, fallback }
    }
}

impl ChunkRenderer for OverlayChunks {
    fn render_chunk(&self, name: &str) -> Result<Html, RenderError> {
        match self.primary.render_chunk(name) {
            Err(RenderError::PartialNotFound { .. }) => {
                tracing::debug!("partial {name} not overridden, using fallback");
                self.fallback.render_chunk(name)
            }
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Broken;

    impl ChunkRenderer for Broken {
        fn render_chunk(&self, name: &str) -> Result<Html, RenderError> {
            Err(io_err(
                name,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            ))
        }
    }

    #[test]
    fn embedded_ships_header_and_footer() {
        let chunks = StaticChunks::embedded();
        assert_eq!(chunks.names(), vec![FOOTER_CHUNK, HEADER_CHUNK]);
        let header = chunks.render_chunk(HEADER_CHUNK).expect("header");
        let footer = chunks.render_chunk(FOOTER_CHUNK).expect("footer");
        assert!(header.as_str().contains("<body"));
        assert!(footer.as_str().contains("</body>"));
    }

    #[test]
    fn static_unknown_name_is_partial_not_found() {
        let err = StaticChunks::new().render_chunk("partials/nav.html").unwrap_err();
        assert!(
            matches!(err, RenderError::PartialNotFound { ref name } if name == "partials/nav.html"),
            "got: {err}"
        );
    }

    #[test]
    fn dir_reads_partial_verbatim() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("partials")).expect("mkdir");
        std::fs::write(dir.path().join("partials/header.html"), "<header>x & y</header>")
            .expect("write");

        let chunks = DirChunks::new(dir.path());
        let html = chunks.render_chunk("partials/header.html").expect("read");
        assert_eq!(html.as_str(), "<header>x & y</header>");
    }

    #[test]
    fn dir_missing_file_is_partial_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let err = DirChunks::new(dir.path()).render_chunk("partials/header.html").unwrap_err();
        assert!(matches!(err, RenderError::PartialNotFound { .. }), "got: {err}");
    }

    #[test]
    fn dir_refuses_names_outside_root() {
        let outer = TempDir::new().expect("tempdir");
        std::fs::write(outer.path().join("secret.html"), "secret").expect("write");
        let root = outer.path().join("site");
        std::fs::create_dir_all(&root).expect("mkdir");

        let chunks = DirChunks::new(&root);
        for name in ["../secret.html", "partials/../../secret.html", "", "/etc/passwd"] {
            let err = chunks.render_chunk(name).unwrap_err();
            assert!(
                matches!(err, RenderError::PartialNotFound { .. }),
                "{name:?} should not resolve, got: {err}"
            );
        }
    }

    #[test]
    fn overlay_prefers_primary_and_falls_back() {
        let primary = StaticChunks::new().with(HEADER_CHUNK, Html::trusted("<header>custom</header>"));
        let overlay = OverlayChunks::new(Arc::new(primary), Arc::new(StaticChunks::embedded()));

        let header = overlay.render_chunk(HEADER_CHUNK).expect("header");
        assert_eq!(header.as_str(), "<header>custom</header>");

        let footer = overlay.render_chunk(FOOTER_CHUNK).expect("footer");
        assert!(footer.as_str().contains("</body>"));

        let err = overlay.render_chunk("partials/nav.html").unwrap_err();
        assert!(matches!(err, RenderError::PartialNotFound { .. }), "got: {err}");
    }

    #[test]
    fn overlay_does_not_mask_primary_failures() {
        let overlay = OverlayChunks::new(Arc::new(Broken), Arc::new(StaticChunks::embedded()));
        let err = overlay.render_chunk(HEADER_CHUNK).unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }), "got: {err}");
    }
}
