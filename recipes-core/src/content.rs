//! Page content files.
//!
//! The host content system owns selection of "recent" items. For local use a
//! page's content is kept in one YAML file:
//!
//! ```text
//! headline: Welcome
//! body: "<p>Hi</p>"
//! recipes:
//!   - { title: Soup, url: /r/1 }
//! tags:
//!   - { title: soups, url: /t/soups }
//! ```

use std::path::Path;

use crate::error::ContentError;
use crate::types::HomePage;

/// Load landing page content from `path`.
///
/// Returns `ContentError::NotFound` if absent,
/// `ContentError::Parse` (with path + line context) if malformed YAML.
pub fn load_home_at(path: &Path) -> Result<HomePage, ContentError> {
    if !path.exists() {
        return Err(ContentError::NotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ContentError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save landing page content to `path`, creating parent directories.
///
/// Write flow: serialize → `.tmp` sibling → `rename`.
pub fn save_home_at(path: &Path, page: &HomePage) -> Result<(), ContentError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let yaml = serde_yaml::to_string(page)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, yaml)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
