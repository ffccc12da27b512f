//! `recipes templates`: list loaded template names.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use recipes_renderer::TemplateEngine;

/// Arguments for `recipes templates`.
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Directory of `.tera` templates that override or extend the embedded ones.
    #[arg(long)]
    pub template_dir: Option<PathBuf>,
}

impl TemplatesArgs {
    pub fn run(self) -> Result<()> {
        let engine = TemplateEngine::new(self.template_dir.as_deref())
            .context("failed to load templates")?;
        for name in engine.template_names() {
            println!("{name}");
        }
        Ok(())
    }
}
