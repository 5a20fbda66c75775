//! Rendering of posts and pages.
//!
//! The site model does not know how content is converted. It hands each post
//! and page to a [`Renderer`] chosen by name (`processor_name` in the config)
//! from a [`RendererRegistry`], then wraps the result in the object's layout
//! chain, innermost layout first. Each layout body receives the content at the
//! literal placeholder `{{ content }}`.
//!
//! Built-in renderers:
//!
//! | Name | Behavior |
//! |------|----------|
//! | `markdown` | `md` / `markdown` bodies through pulldown-cmark; others unchanged |
//! | `passthrough` | every body unchanged |
//!
//! The renderer is resolved once per build. Assets are never rendered.

use crate::config::SiteConfig;
use crate::frontmatter::Metadata;
use crate::layout::Layout;
use crate::site::Site;
use pulldown_cmark::{Options, Parser, html as md_html};
use serde_yaml::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Marker in a layout body replaced by the content it wraps.
pub const CONTENT_PLACEHOLDER: &str = "{{ content }}";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unknown processor '{0}'")]
    UnknownProcessor(String),
    #[error("invalid arguments for processor '{processor}': {message}")]
    InvalidArgs { processor: String, message: String },
    #[error("{path} uses layout '{layout}', which does not exist")]
    UnknownLayout { path: String, layout: String },
}

/// Everything a renderer sees of one content object.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub path: &'a str,
    /// Source extension without the dot.
    pub ext: &'a str,
    pub body: &'a str,
    pub metadata: &'a Metadata,
    pub config: &'a SiteConfig,
}

/// Converts a content body into output bytes.
pub trait Renderer {
    fn name(&self) -> &str;

    /// Whether output for `ext` sources is HTML rather than the source format.
    fn converts(&self, ext: &str) -> bool;

    fn render(&self, input: &RenderInput<'_>) -> Result<Vec<u8>, RenderError>;
}

/// Builds a renderer from its `processor_args`.
pub type RendererFactory = fn(&Value) -> Result<Box<dyn Renderer>, RenderError>;

/// Renderer factories keyed by processor name.
#[derive(Clone)]
pub struct RendererRegistry {
    factories: BTreeMap<String, RendererFactory>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

impl RendererRegistry {
    /// A registry with no renderers.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry with `markdown` and `passthrough`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("markdown", MarkdownRenderer::from_args);
        registry.register("passthrough", PassthroughRenderer::from_args);
        registry
    }

    /// Add or replace the factory for `name`.
    pub fn register(&mut self, name: impl Into<String>, factory: RendererFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build the renderer registered as `name`.
    pub fn resolve(&self, name: &str, args: &Value) -> Result<Box<dyn Renderer>, RenderError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RenderError::UnknownProcessor(name.to_string()))?;
        factory(args)
    }

    /// Build the renderer a site's config selects.
    pub fn resolve_for(&self, config: &SiteConfig) -> Result<Box<dyn Renderer>, RenderError> {
        let conventions = &config.conventions;
        self.resolve(&conventions.processor_name, &conventions.processor_args)
    }
}

// =============================================================================
// Built-in renderers
// =============================================================================

/// Markdown via pulldown-cmark.
///
/// `processor_args: { extensions: [tables, footnotes, strikethrough, tasklists] }`
/// enables the matching pulldown-cmark options.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    const EXTENSIONS: &'static [&'static str] = &["md", "markdown"];

    pub fn new(options: Options) -> Self {
        Self { options }
    }

    fn from_args(args: &Value) -> Result<Box<dyn Renderer>, RenderError> {
        let invalid = |message: String| RenderError::InvalidArgs {
            processor: "markdown".to_string(),
            message,
        };

        let mut options = Options::empty();
        let extensions = match args.get("extensions") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(seq)) => seq.clone(),
            Some(_) => return Err(invalid("extensions must be a list".to_string())),
        };
        for ext in &extensions {
            options |= match ext.as_str() {
                Some("tables") => Options::ENABLE_TABLES,
                Some("footnotes") => Options::ENABLE_FOOTNOTES,
                Some("strikethrough") => Options::ENABLE_STRIKETHROUGH,
                Some("tasklists") => Options::ENABLE_TASKLISTS,
                Some(other) => return Err(invalid(format!("unknown extension '{other}'"))),
                None => return Err(invalid("extensions must be strings".to_string())),
            };
        }
        Ok(Box::new(Self::new(options)))
    }
}

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &str {
        "markdown"
    }

    fn converts(&self, ext: &str) -> bool {
        Self::EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<Vec<u8>, RenderError> {
        if !self.converts(input.ext) {
            return Ok(input.body.as_bytes().to_vec());
        }
        let parser = Parser::new_ext(input.body, self.options);
        let mut out = String::with_capacity(input.body.len() * 3 / 2);
        md_html::push_html(&mut out, parser);
        Ok(out.into_bytes())
    }
}

/// Leaves every body as written.
#[derive(Debug, Clone, Default)]
pub struct PassthroughRenderer;

impl PassthroughRenderer {
    fn from_args(_args: &Value) -> Result<Box<dyn Renderer>, RenderError> {
        Ok(Box::new(Self))
    }
}

impl Renderer for PassthroughRenderer {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn converts(&self, _ext: &str) -> bool {
        false
    }

    fn render(&self, input: &RenderInput<'_>) -> Result<Vec<u8>, RenderError> {
        Ok(input.body.as_bytes().to_vec())
    }
}

// =============================================================================
// Site rendering
// =============================================================================

/// One rendered post or page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedObject {
    /// Source path relative to the site root.
    pub path: String,
    /// Output path relative to the output directory.
    pub output_path: String,
    pub bytes: Vec<u8>,
}

/// Wrap `content` in each layout of `chain`, innermost first.
pub fn apply_layouts(content: String, chain: &[&Layout]) -> String {
    chain.iter().fold(content, |inner, layout| {
        layout.body.replace(CONTENT_PLACEHOLDER, &inner)
    })
}

/// Render every post and page of a built site.
///
/// A post or page that names an unregistered layout fails the whole render.
pub fn render_site(site: &Site, renderer: &dyn Renderer) -> Result<Vec<RenderedObject>, RenderError> {
    let mut rendered = Vec::new();

    for post in site.posts_built() {
        let input = RenderInput {
            path: &post.path,
            ext: &post.ext,
            body: &post.body,
            metadata: &post.metadata,
            config: site.config(),
        };
        let output = post.url().trim_start_matches('/').to_string();
        rendered.push(render_one(site, renderer, &input, output)?);
    }

    for page in site.pages_built() {
        let input = RenderInput {
            path: &page.path,
            ext: &page.ext,
            body: &page.body,
            metadata: &page.metadata,
            config: site.config(),
        };
        let output = page_output_path(&page.path, &page.ext, renderer);
        rendered.push(render_one(site, renderer, &input, output)?);
    }

    Ok(rendered)
}

fn render_one(
    site: &Site,
    renderer: &dyn Renderer,
    input: &RenderInput<'_>,
    output: String,
) -> Result<RenderedObject, RenderError> {
    let body = renderer.render(input)?;
    let bytes = match input.metadata.layout.as_deref() {
        None => body,
        Some(name) => {
            let layouts = site.layout_set();
            if !layouts.contains(name) {
                return Err(RenderError::UnknownLayout {
                    path: input.path.to_string(),
                    layout: name.to_string(),
                });
            }
            let inner = String::from_utf8_lossy(&body).into_owned();
            apply_layouts(inner, &layouts.chain(name)).into_bytes()
        }
    };
    debug!(source = %input.path, output = %output, renderer = renderer.name(), "rendered");
    Ok(RenderedObject {
        path: input.path.to_string(),
        output_path: output,
        bytes,
    })
}

/// Output path of a page: `.html` replaces the extension when the renderer
/// converts it, otherwise the source path is kept.
pub fn page_output_path(path: &str, ext: &str, renderer: &dyn Renderer) -> String {
    if ext.is_empty() || !renderer.converts(ext) {
        return path.to_string();
    }
    let stem = &path[..path.len() - ext.len() - 1];
    format!("{stem}.html")
}
