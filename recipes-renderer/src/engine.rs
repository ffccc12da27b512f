//! Tera rendering engine: [`render`], [`TemplateEngine`] and [`Renderer`].
//!
//! Templates include partials through the `render_chunk` function:
//!
//! ```text
//! {{ render_chunk(name="partials/header.html") }}
//! ```
//!
//! Each render registers that function on its own copy of the Tera instance,
//! bound to the context's `page` source. Tera autoescaping is off; escaping
//! already happened when the context was converted (see [`crate::context`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tera::Tera;

use recipes_core::types::HomePage;

use crate::chunks::ChunkRenderer;
use crate::context::RenderContext;
use crate::error::{io_err, RenderError};

/// Name of the embedded landing page template.
pub const HOME_TEMPLATE: &str = "home.html.tera";

const INLINE_TEMPLATE: &str = "__inline__";
const CHUNK_FUNCTION: &str = "render_chunk";

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[(HOME_TEMPLATE, include_str!("templates/home.html.tera"))];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        tracing::debug!("no user templates at {}", dir.display());
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        tracing::debug!("loaded user template {name} from {}", path.display());
        templates.push((name, contents));
    }
    Ok(templates)
}

fn new_tera() -> Tera {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = new_tera();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Rendering core
// ---------------------------------------------------------------------------

/// First error raised by the partial source during one render.
type ChunkFailure = Arc<Mutex<Option<RenderError>>>;

fn register_chunk_function(tera: &mut Tera, page: Option<Arc<dyn ChunkRenderer>>) -> ChunkFailure {
    let failure: ChunkFailure = Arc::default();
    let slot = Arc::clone(&failure);
    tera.register_function(
        CHUNK_FUNCTION,
        move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
            let name = match args.get("name") {
                Some(tera::Value::String(name)) => name.as_str(),
                _ => {
                    return Err(tera::Error::msg(format!(
                        "`{CHUNK_FUNCTION}` expects a string `name` argument"
                    )))
                }
            };
            let Some(page) = page.as_ref() else {
                return Err(record(&slot, RenderError::MissingBinding { name: "page".to_string() }));
            };
            match page.render_chunk(name) {
                Ok(html) => {
                    tracing::debug!("included partial {name}");
                    Ok(tera::Value::String(html.into_string()))
                }
                Err(err) => Err(record(&slot, err)),
            }
        },
    );
    failure
}

fn record(slot: &ChunkFailure, err: RenderError) -> tera::Error {
    let msg = err.to_string();
    if let Ok(mut captured) = slot.lock() {
        captured.get_or_insert(err);
    }
    tera::Error::msg(msg)
}

/// Name of the undefined variable if `err` is Tera's lookup failure.
fn missing_variable(err: &tera::Error) -> Option<String> {
    let mut current = Some(err as &(dyn std::error::Error + 'static));
    while let Some(e) = current {
        let msg = e.to_string();
        if let Some((name, tail)) = msg
            .strip_prefix("Variable `")
            .and_then(|rest| rest.split_once('`'))
        {
            if tail.starts_with(" not found in context") {
                return Some(name.to_string());
            }
        }
        current = e.source();
    }
    None
}

fn render_in(mut tera: Tera, name: &str, ctx: &RenderContext) -> Result<String, RenderError> {
    let failure = register_chunk_function(&mut tera, ctx.page().cloned());
    let tera_ctx = ctx.to_tera_context()?;
    match tera.render(name, &tera_ctx) {
        Ok(out) => {
            tracing::debug!("rendered {name} ({} bytes)", out.len());
            Ok(out)
        }
        Err(err) => {
            let captured = failure.lock().ok().and_then(|mut slot| slot.take());
            Err(captured.unwrap_or_else(|| match missing_variable(&err) {
                Some(name) => RenderError::MissingBinding { name },
                None => RenderError::Tera(err),
            }))
        }
    }
}

/// Render a template string against `ctx`.
///
/// Errors: [`RenderError::MissingBinding`] for an unbound name (or a
/// `render_chunk` call without a `page` source), [`RenderError::PartialNotFound`]
/// when the page source cannot resolve a partial, [`RenderError::Tera`] for
/// syntax errors.
pub fn render(template: &str, ctx: &RenderContext) -> Result<String, RenderError> {
    let mut tera = new_tera();
    tera.add_raw_template(INLINE_TEMPLATE, template)?;
    render_in(tera, INLINE_TEMPLATE, ctx)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering named templates with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded defaults.
/// Template names are normalised to lowercase and relative paths.
#[derive(Clone)]
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `user_template_dir`.
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render the template registered under `name`.
    pub fn render(&self, name: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        render_in(self.tera.clone(), name, ctx)
    }

    /// Loaded template names, sorted.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tera.get_template_names().map(str::to_owned).collect();
        names.sort();
        names
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Landing page renderer over the embedded templates.
///
/// Create once with [`Renderer::new`] and reuse.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(None)? })
    }

    /// Render the landing page for `home`, including partials from `page`.
    pub fn render_home(
        &self,
        home: &HomePage,
        page: Arc<dyn ChunkRenderer>,
    ) -> Result<String, RenderError> {
        let ctx = RenderContext::from_home(home).with_page(page);
        self.render_with_context(&ctx)
    }

    /// Render the landing page using a caller-provided [`RenderContext`].
    pub fn render_with_context(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        self.engine.render(HOME_TEMPLATE, ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::{StaticChunks, FOOTER_CHUNK, HEADER_CHUNK};
    use recipes_core::types::{Html, Recipe, Tag};

    fn fake_chunks() -> Arc<dyn ChunkRenderer> {
        Arc::new(
            StaticChunks::new()
                .with(HEADER_CHUNK, Html::trusted("<!--header-->"))
                .with(FOOTER_CHUNK, Html::trusted("<!--footer-->")),
        )
    }

    fn home() -> HomePage {
        HomePage {
            headline: "Welcome".to_string(),
            body: Html::trusted("<p>Hi</p>"),
            recipes: vec![Recipe::new("Soup", "/r/1")],
            tags: vec![Tag::new("soups", "/t/soups")],
        }
    }

    #[test]
    fn renderer_new_succeeds() {
        Renderer::new().expect("Renderer::new should succeed with embedded templates");
    }

    #[test]
    fn embedded_home_template_is_registered() {
        let engine = TemplateEngine::new(None).expect("engine");
        assert_eq!(engine.template_names(), vec![HOME_TEMPLATE.to_string()]);
        assert!(engine.has_template(HOME_TEMPLATE));
        assert!(!engine.has_template("missing.html.tera"));
    }

    #[test]
    fn inline_render_interpolates_and_loops() {
        let mut ctx = RenderContext::new();
        ctx.insert_text("headline", "Hello")
            .insert_links("items", [crate::LinkCtx::new("/a", "A"), crate::LinkCtx::new("/b", "B")]);
        let out = render("{{ headline }}:{% for i in items %}[{{ i.title }}]{% endfor %}", &ctx)
            .expect("render");
        assert_eq!(out, "Hello:[A][B]");
    }

    #[test]
    fn inline_render_includes_partials() {
        let ctx = RenderContext::new().with_page(fake_chunks());
        let out = render(
            r#"{{ render_chunk(name="partials/header.html") }}|{{ render_chunk(name="partials/footer.html") }}"#,
            &ctx,
        )
        .expect("render");
        assert_eq!(out, "<!--header-->|<!--footer-->");
    }

    #[test]
    fn home_renders_with_fake_partials() {
        let renderer = Renderer::new().expect("renderer");
        let out = renderer.render_home(&home(), fake_chunks()).expect("render");
        assert!(out.starts_with("<!--header-->"));
        assert!(out.trim_end().ends_with("<!--footer-->"));
        assert!(out.contains(r#"<h2 class="page-headline">Welcome</h2>"#));
        assert!(out.contains(r#"<a href="/t/soups">soups</a>"#));
    }

    #[test]
    fn missing_page_source_is_missing_binding() {
        let renderer = Renderer::new().expect("renderer");
        let ctx = RenderContext::from_home(&home());
        let err = renderer.render_with_context(&ctx).unwrap_err();
        assert!(
            matches!(err, RenderError::MissingBinding { ref name } if name == "page"),
            "got: {err}"
        );
    }

    #[test]
    fn unknown_template_name_is_tera_error() {
        let engine = TemplateEngine::new(None).expect("engine");
        let err = engine.render("nope.html.tera", &RenderContext::new()).unwrap_err();
        assert!(matches!(err, RenderError::Tera(_)), "got: {err}");
    }

    #[test]
    fn syntax_error_is_tera_error() {
        let err = render("{% for x in %}", &RenderContext::new()).unwrap_err();
        assert!(matches!(err, RenderError::Tera(_)), "got: {err}");
    }

    #[test]
    fn render_chunk_without_name_argument_fails() {
        let ctx = RenderContext::new().with_page(fake_chunks());
        let err = render("{{ render_chunk(path=\"x\") }}", &ctx).unwrap_err();
        assert!(matches!(err, RenderError::Tera(_)), "got: {err}");
    }
}
