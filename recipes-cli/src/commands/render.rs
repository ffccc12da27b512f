//! `recipes render`: load page content, render it, print or write the HTML.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use recipes_core::content;
use recipes_renderer::{
    ChunkRenderer, DirChunks, OverlayChunks, RenderContext, StaticChunks, TemplateEngine,
    HOME_TEMPLATE,
};

/// Arguments for `recipes render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// YAML file with the page's headline, body, recipes and tags.
    #[arg(long, short)]
    pub content: PathBuf,

    /// Name of the template to render.
    #[arg(long, default_value = HOME_TEMPLATE)]
    pub template: String,

    /// Directory of `.tera` templates that override the embedded ones.
    #[arg(long)]
    pub template_dir: Option<PathBuf>,

    /// Directory of partials that override the embedded header and footer.
    #[arg(long)]
    pub partials_dir: Option<PathBuf>,

    /// Write the page to this file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let home = content::load_home_at(&self.content)
            .with_context(|| format!("failed to load content from {}", self.content.display()))?;

        let engine = TemplateEngine::new(self.template_dir.as_deref())
            .context("failed to load templates")?;
        if !engine.has_template(&self.template) {
            bail!(
                "unknown template '{}'; run `recipes templates` to list available templates",
                self.template
            );
        }

        let ctx = RenderContext::from_home(&home).with_page(chunk_source(self.partials_dir.as_deref())?);
        let html = engine
            .render(&self.template, &ctx)
            .with_context(|| format!("failed to render '{}'", self.template))?;
        let html = html.replace("\r\n", "\n");

        match &self.output {
            None => print!("{html}"),
            Some(path) => {
                write_output(path, &html)?;
                tracing::info!(path = %path.display(), bytes = html.len(), "page written");
                println!("{} {}", "wrote:".green(), path.display());
            }
        }
        Ok(())
    }
}

/// Embedded partials, overridden per file by `partials_dir` when given.
fn chunk_source(partials_dir: Option<&Path>) -> Result<Arc<dyn ChunkRenderer>> {
    let embedded: Arc<dyn ChunkRenderer> = Arc::new(StaticChunks::embedded());
    let Some(dir) = partials_dir else {
        return Ok(embedded);
    };
    if !dir.is_dir() {
        bail!("partials directory not found: {}", dir.display());
    }
    tracing::debug!(dir = %dir.display(), "using partial overrides");
    Ok(Arc::new(OverlayChunks::new(Arc::new(DirChunks::new(dir)), embedded)))
}

fn write_output(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))
}
