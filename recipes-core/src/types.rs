//! Content types for the recipes site.
//!
//! Plain text and trusted markup are distinct types: a `String` is always
//! escaped on output, an [`Html`] never is. Nothing converts a `String` into
//! [`Html`] implicitly.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Html
// ---------------------------------------------------------------------------

/// Pre-rendered markup that is emitted verbatim.
///
/// Construct with [`Html::trusted`] only for content that was sanitised by
/// the content system (editor output, partial files shipped with the site).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Html(String);

impl Html {
    /// Wrap markup that is already safe to splice into a page.
    pub fn trusted(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Content items
// ---------------------------------------------------------------------------

/// A published recipe, as listed on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub url: String,
}

impl Recipe {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into() }
    }
}

/// A tag grouping recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
    pub url: String,
}

impl Tag {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into() }
    }
}

/// Everything the landing page shows besides header and footer chrome.
///
/// `recipes` and `tags` are already selected and ordered by the content
/// system; they are rendered in the order given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomePage {
    pub headline: String,
    pub body: Html,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
