//! Recipes: render the recipes site landing page from a content file.
//!
//! # Usage
//!
//! ```text
//! recipes render --content <home.yaml> [--template <name>] [--template-dir <dir>]
//!                [--partials-dir <dir>] [--output <file>]
//! recipes templates [--template-dir <dir>]
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` (default `info`) to change verbosity.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{render::RenderArgs, templates::TemplatesArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "recipes",
    version,
    about = "Render the recipes site landing page",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a page from a YAML content file.
    Render(RenderArgs),

    /// List the templates available to `render`.
    Templates(TemplatesArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => args.run(),
        Commands::Templates(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
