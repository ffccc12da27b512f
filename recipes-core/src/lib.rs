//! Recipes core library: content types, content loading, errors.
//!
//! - [`types`]: page content and the trusted [`Html`] newtype
//! - [`error`]: [`ContentError`]
//! - [`content`]: load / save page content files

pub mod content;
pub mod error;
pub mod types;

pub use error::ContentError;
pub use types::{HomePage, Html, Recipe, Tag};
