//! # recipes-renderer
//!
//! Tera-based renderer for the recipes site landing page.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use recipes_core::HomePage;
//! use recipes_renderer::{Renderer, StaticChunks};
//!
//! fn render_landing(home: &HomePage) {
//!     if let Ok(renderer) = Renderer::new() {
//!         match renderer.render_home(home, Arc::new(StaticChunks::embedded())) {
//!             Ok(html) => println!("{html}"),
//!             Err(e) => eprintln!("render failed: {e}"),
//!         }
//!     }
//! }
//! ```

pub mod chunks;
pub mod context;
pub mod engine;
pub mod error;

pub use chunks::{ChunkRenderer, DirChunks, OverlayChunks, StaticChunks, FOOTER_CHUNK, HEADER_CHUNK};
pub use context::{Binding, LinkCtx, RenderContext};
pub use engine::{render, Renderer, TemplateEngine, HOME_TEMPLATE};
pub use error::RenderError;
