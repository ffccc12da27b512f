//! Render context: named, typed bindings plus the page's partial source.
//!
//! Escaping is decided by the binding type, not by the template:
//! [`Binding::Text`] and link fields are HTML-escaped when the context is
//! handed to Tera, [`Binding::Html`] is passed through untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use recipes_core::types::{HomePage, Html, Recipe, Tag};

use crate::chunks::ChunkRenderer;
use crate::error::RenderError;

/// A `{url, title}` item in an ordered list binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCtx {
    pub url: String,
    pub title: String,
}

impl LinkCtx {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self { url: url.into(), title: title.into() }
    }

    fn escaped(&self) -> Self {
        Self {
            url: escape_html(&self.url),
            title: escape_html(&self.title),
        }
    }
}

impl From<&Recipe> for LinkCtx {
    fn from(r: &Recipe) -> Self {
        Self::new(r.url.clone(), r.title.clone())
    }
}

impl From<&Tag> for LinkCtx {
    fn from(t: &Tag) -> Self {
        Self::new(t.url.clone(), t.title.clone())
    }
}

/// A value bound to a name in the [`RenderContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Plain text, escaped on output.
    Text(String),
    /// Trusted markup, emitted verbatim.
    Html(Html),
    /// Ordered links; `url` and `title` are escaped on output.
    Links(Vec<LinkCtx>),
}

impl Binding {
    fn to_value(&self) -> Result<serde_json::Value, RenderError> {
        let value = match self {
            Binding::Text(text) => serde_json::Value::String(escape_html(text)),
            Binding::Html(html) => serde_json::Value::String(html.as_str().to_owned()),
            Binding::Links(links) => {
                let escaped: Vec<LinkCtx> = links.iter().map(LinkCtx::escaped).collect();
                serde_json::to_value(escaped)?
            }
        };
        Ok(value)
    }
}

/// The named values available to one render pass, plus the `page`
/// capability used to include partials.
///
/// Read-only during rendering; the same context renders to the same output
/// every time.
#[derive(Clone, Default)]
pub struct RenderContext {
    bindings: BTreeMap<String, Binding>,
    page: Option<Arc<dyn ChunkRenderer>>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `headline`, `body`, `recipes` and `tags` from landing page content.
    ///
    /// The partial source is not part of the content; attach it with
    /// [`RenderContext::with_page`].
    pub fn from_home(home: &HomePage) -> Self {
        let mut ctx = Self::new();
        ctx.insert_text("headline", home.headline.clone())
            .insert_html("body", home.body.clone())
            .insert_links("recipes", &home.recipes)
            .insert_links("tags", &home.tags);
        ctx
    }

    /// Attach the partial source used by `render_chunk(name=...)`.
    pub fn with_page(mut self, page: Arc<dyn ChunkRenderer>) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page(&self) -> Option<&Arc<dyn ChunkRenderer>> {
        self.page.as_ref()
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.bindings.insert(name.into(), Binding::Text(value.into()));
        self
    }

    pub fn insert_html(&mut self, name: impl Into<String>, value: Html) -> &mut Self {
        self.bindings.insert(name.into(), Binding::Html(value));
        self
    }

    pub fn insert_links<I, L>(&mut self, name: impl Into<String>, items: I) -> &mut Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LinkCtx>,
    {
        let links = items.into_iter().map(Into::into).collect();
        self.bindings.insert(name.into(), Binding::Links(links));
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.bindings.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Convert to a [`tera::Context`], escaping text bindings.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        let mut ctx = tera::Context::new();
        for (name, binding) in &self.bindings {
            ctx.insert(name.as_str(), &binding.to_value()?);
        }
        Ok(ctx)
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("bindings", &self.bindings)
            .field("page", &self.page.is_some())
            .finish()
    }
}

/// Escape `& < > " '` for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
