//! The site model.
//!
//! A [`Site`] owns everything one build discovers: the configuration, the
//! classifier, the layout registry, and the post, page, and asset collections.
//! The collections are built by four phases that always run in the same order:
//!
//! ```text
//! layouts → posts → pages → assets
//! ```
//!
//! Each phase method runs its predecessor first, then its own collector once,
//! and caches the result for the rest of the build. Asking for assets on a
//! fresh site therefore runs all four phases; asking again runs none. The order
//! matters because every collector skips paths claimed by an earlier one.

use crate::classifier::Classifier;
use crate::collect::{self, Collected, Skipped};
use crate::config::{self, SiteConfig};
use crate::content::{Asset, Page, Post};
use crate::layout::{Layout, LayoutError, LayoutRegistry};
use crate::walk::WalkError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("source directory does not exist: {0}")]
    MissingSource(PathBuf),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Walk(#[from] WalkError),
}

/// Every object a build produced, in production order.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SiteObject<'a> {
    Layout(&'a Layout),
    Post(&'a Post),
    Page(&'a Page),
    Asset(&'a Asset),
}

impl SiteObject<'_> {
    /// Source path relative to the site root.
    pub fn path(&self) -> &str {
        match self {
            Self::Layout(l) => &l.path,
            Self::Post(p) => &p.path,
            Self::Page(p) => &p.path,
            Self::Asset(a) => &a.path,
        }
    }
}

/// One build's content graph.
#[derive(Debug)]
pub struct Site {
    source: PathBuf,
    config: SiteConfig,
    classifier: Classifier,
    layouts: LayoutRegistry,
    layouts_loaded: bool,
    posts: Option<Vec<Post>>,
    pages: Option<Vec<Page>>,
    assets: Option<Vec<Asset>>,
    skipped: Vec<Skipped>,
}

impl Site {
    /// Open a source tree, loading `_config.yml` from it.
    pub fn open(source: impl Into<PathBuf>) -> Result<Self, SiteError> {
        let source = source.into();
        let config = config::load_config(&source, None);
        Self::with_config(source, config)
    }

    /// Open a source tree with an already-loaded configuration.
    pub fn with_config(source: impl Into<PathBuf>, config: SiteConfig) -> Result<Self, SiteError> {
        let source = source.into();
        if !source.is_dir() {
            return Err(SiteError::MissingSource(source));
        }
        Ok(Self {
            source,
            config,
            classifier: Classifier::new(),
            layouts: LayoutRegistry::default(),
            layouts_loaded: false,
            posts: None,
            pages: None,
            assets: None,
            skipped: Vec::new(),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Candidates skipped by the phases that have run so far.
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    /// Directories searched for layouts.
    pub fn layout_paths(&self) -> Vec<PathBuf> {
        vec![self.source.join(&self.config.conventions.layout_dir)]
    }

    /// Directories searched for includes; empty when the include dir is absent.
    pub fn include_paths(&self) -> Vec<PathBuf> {
        let dir = self.source.join(&self.config.conventions.include_dir);
        if dir.is_dir() { vec![dir] } else { Vec::new() }
    }

    /// Output directory, relative to the source unless configured absolute.
    pub fn output_dir(&self) -> PathBuf {
        self.source.join(&self.config.conventions.site_dir)
    }

    // =========================================================================
    // Phases
    // =========================================================================

    /// Phase 1: load and link layouts.
    pub fn layouts(&mut self) -> Result<&LayoutRegistry, SiteError> {
        if !self.layouts_loaded {
            self.layouts = LayoutRegistry::load(
                &self.source,
                &self.config.conventions.layout_dir,
                &mut self.classifier,
            )?;
            self.layouts_loaded = true;
        }
        Ok(&self.layouts)
    }

    /// Phase 2: collect posts, after layouts.
    pub fn posts(&mut self) -> Result<&[Post], SiteError> {
        self.layouts()?;
        if self.posts.is_none() {
            let collected =
                collect::posts(&self.source, &self.config.conventions, &mut self.classifier)?;
            self.posts = Some(self.absorb(collected));
        }
        Ok(self.posts.get_or_insert_with(Vec::new))
    }

    /// Phase 3: collect pages, after posts.
    pub fn pages(&mut self) -> Result<&[Page], SiteError> {
        self.posts()?;
        if self.pages.is_none() {
            let collected =
                collect::pages(&self.source, &self.config.conventions, &mut self.classifier)?;
            self.pages = Some(self.absorb(collected));
        }
        Ok(self.pages.get_or_insert_with(Vec::new))
    }

    /// Phase 4: collect assets, after pages.
    pub fn assets(&mut self) -> Result<&[Asset], SiteError> {
        self.pages()?;
        if self.assets.is_none() {
            let collected =
                collect::assets(&self.source, &self.config.conventions, &mut self.classifier)?;
            self.assets = Some(self.absorb(collected));
        }
        Ok(self.assets.get_or_insert_with(Vec::new))
    }

    fn absorb<T>(&mut self, collected: Collected<T>) -> Vec<T> {
        self.skipped.extend(collected.skipped);
        collected.items
    }

    /// Run every phase that has not run yet.
    pub fn build(&mut self) -> Result<(), SiteError> {
        self.assets()?;
        info!(
            layouts = self.layouts.len(),
            posts = self.posts_built().len(),
            pages = self.pages_built().len(),
            assets = self.assets_built().len(),
            skipped = self.skipped.len(),
            "site model built"
        );
        Ok(())
    }

    // =========================================================================
    // Read-only views of completed phases
    // =========================================================================

    /// Posts collected so far, without running any phase.
    pub fn posts_built(&self) -> &[Post] {
        self.posts.as_deref().unwrap_or_default()
    }

    /// Pages collected so far, without running any phase.
    pub fn pages_built(&self) -> &[Page] {
        self.pages.as_deref().unwrap_or_default()
    }

    /// Assets collected so far, without running any phase.
    pub fn assets_built(&self) -> &[Asset] {
        self.assets.as_deref().unwrap_or_default()
    }

    /// Every object produced so far: layouts, then posts, pages, and assets,
    /// each in collection order. Call [`Site::build`] first for the full graph.
    pub fn objects(&self) -> Vec<SiteObject<'_>> {
        let mut objects: Vec<SiteObject<'_>> = Vec::new();
        objects.extend(self.layouts.iter().map(SiteObject::Layout));
        objects.extend(self.posts_built().iter().map(SiteObject::Post));
        objects.extend(self.pages_built().iter().map(SiteObject::Page));
        objects.extend(self.assets_built().iter().map(SiteObject::Asset));
        objects
    }

    /// Graph of everything built so far, for display and serialization.
    pub fn graph(&self) -> SiteGraph<'_> {
        SiteGraph {
            layouts: self
                .layouts
                .iter()
                .map(|l| LayoutEntry {
                    layout: l,
                    chain: self
                        .layouts
                        .chain(&l.name)
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect(),
                })
                .collect(),
            posts: self.posts_built(),
            pages: self.pages_built(),
            assets: self.assets_built(),
            skipped: &self.skipped,
            config: &self.config,
        }
    }

    /// Layouts of the completed layout phase; empty before it runs.
    pub fn layout_set(&self) -> &LayoutRegistry {
        &self.layouts
    }

    /// Posts sorted by date, then slug.
    pub fn posts_chronological(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts_built().iter().collect();
        posts.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.slug.cmp(&b.slug)));
        posts
    }
}

/// Layout plus its resolved inheritance chain.
#[derive(Debug, Serialize)]
pub struct LayoutEntry<'a> {
    #[serde(flatten)]
    pub layout: &'a Layout,
    pub chain: Vec<&'a str>,
}

/// Serializable snapshot of a built site.
#[derive(Debug, Serialize)]
pub struct SiteGraph<'a> {
    pub layouts: Vec<LayoutEntry<'a>>,
    pub posts: &'a [Post],
    pub pages: &'a [Page],
    pub assets: &'a [Asset],
    #[serde(skip_serializing_if = "no_skips")]
    pub skipped: &'a [Skipped],
    pub config: &'a SiteConfig,
}

fn no_skips(skipped: &&[Skipped]) -> bool {
    skipped.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ContentKind;
    use crate::test_helpers::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn scenario_fixture() {
        let tmp = setup_fixtures();
        let mut site = Site::open(tmp.path()).unwrap();
        site.build().unwrap();

        let layouts: Vec<&str> = site.layout_set().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(layouts, vec!["default"]);

        let posts = site.posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello");
        assert_eq!(posts[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let pages: Vec<String> = site.pages().unwrap().iter().map(|p| p.path.clone()).collect();
        assert_eq!(pages, vec!["about.html"]);

        let assets: Vec<String> = site.assets().unwrap().iter().map(|a| a.path.clone()).collect();
        assert_eq!(assets, vec!["robots.txt"]);

        assert_eq!(site.classifier().len(), 4);
        assert!(site.skipped().is_empty());
    }

    #[test]
    fn asking_for_pages_runs_earlier_phases() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("_layouts/default.html", "{{ content }}"),
                ("_posts/2024-01-01-hello.md", "hi"),
                ("index.html", "home"),
            ],
        );

        let mut site = Site::open(tmp.path()).unwrap();
        assert!(site.classifier().is_empty());

        site.pages().unwrap();
        assert_eq!(
            site.classifier().kind_of("_layouts/default.html"),
            Some(ContentKind::Layout)
        );
        assert_eq!(
            site.classifier().kind_of("_posts/2024-01-01-hello.md"),
            Some(ContentKind::Post)
        );
        assert_eq!(site.classifier().kind_of("index.html"), Some(ContentKind::Page));
        assert!(site.assets.is_none());
    }

    #[test]
    fn phases_are_memoized() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), &[("about.html", "about")]);

        let mut site = Site::open(tmp.path()).unwrap();
        assert_eq!(site.pages().unwrap().len(), 1);

        // A file appearing after the page phase is never a page; the asset
        // phase has not run yet and still sees it.
        write_tree(tmp.path(), &[("late.html", "late")]);
        assert_eq!(site.pages().unwrap().len(), 1);
        let assets: Vec<String> = site.assets().unwrap().iter().map(|a| a.path.clone()).collect();
        assert_eq!(assets, vec!["late.html"]);
    }

    #[test]
    fn post_in_public_posts_dir_is_never_also_a_page() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("_config.yml", "posts_dir: blog"),
                ("blog/2024-01-01-hello.html", "<p>hi</p>"),
            ],
        );

        let mut site = Site::open(tmp.path()).unwrap();
        site.build().unwrap();

        assert_eq!(site.posts().unwrap().len(), 1);
        assert!(site.pages().unwrap().is_empty());
        assert!(site.assets().unwrap().is_empty());
        assert_eq!(
            site.classifier().kind_of("blog/2024-01-01-hello.html"),
            Some(ContentKind::Post)
        );
    }

    #[test]
    fn drafts_excluded_everywhere() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[("_drafts/note.md", "draft"), ("_drafts/img.png", "png")],
        );

        let mut site = Site::open(tmp.path()).unwrap();
        site.build().unwrap();
        assert!(site.pages().unwrap().is_empty());
        assert!(site.assets().unwrap().is_empty());
        assert!(site.classifier().is_empty());
    }

    #[test]
    fn missing_parent_aborts_build() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("_layouts/ok.html", "{{ content }}"),
                ("_layouts/post.html", "---\nlayout: ghost\n---\n{{ content }}"),
                ("about.html", "about"),
            ],
        );

        let mut site = Site::open(tmp.path()).unwrap();
        let err = site.build().unwrap_err();
        assert!(matches!(
            err,
            SiteError::Layout(LayoutError::MissingParent { .. })
        ));
    }

    #[test]
    fn missing_source_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = Site::open(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, SiteError::MissingSource(_)));
    }

    #[test]
    fn objects_in_production_order() {
        let tmp = setup_fixtures();
        let mut site = Site::open(tmp.path()).unwrap();
        site.build().unwrap();

        let kinds: Vec<&str> = site
            .objects()
            .iter()
            .map(|o| match o {
                SiteObject::Layout(_) => "layout",
                SiteObject::Post(_) => "post",
                SiteObject::Page(_) => "page",
                SiteObject::Asset(_) => "asset",
            })
            .collect();
        assert_eq!(kinds, vec!["layout", "post", "page", "asset"]);
        assert_eq!(site.objects()[3].path(), "robots.txt");
    }

    #[test]
    fn include_paths_only_when_present() {
        let tmp = TempDir::new().unwrap();
        let site = Site::open(tmp.path()).unwrap();
        assert!(site.include_paths().is_empty());

        write_tree(tmp.path(), &[("_includes/nav.html", "<nav/>")]);
        let site = Site::open(tmp.path()).unwrap();
        assert_eq!(site.include_paths(), vec![tmp.path().join("_includes")]);
        assert_eq!(site.layout_paths(), vec![tmp.path().join("_layouts")]);
    }

    #[test]
    fn posts_sorted_chronologically_on_request() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("_posts/b/2024-01-01-new.md", "new"),
                ("_posts/a/2020-01-01-old.md", "old"),
            ],
        );

        let mut site = Site::open(tmp.path()).unwrap();
        site.build().unwrap();
        let slugs: Vec<&str> = site
            .posts_chronological()
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["old", "new"]);
    }

    #[test]
    fn skipped_candidates_are_reported() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[
                ("good.html", "<p>ok</p>"),
                ("bad.html", "---\ntitle: [\n---\n"),
            ],
        );

        let mut site = Site::open(tmp.path()).unwrap();
        site.build().unwrap();
        assert_eq!(site.pages().unwrap().len(), 1);
        assert_eq!(site.skipped().len(), 1);
        assert_eq!(site.skipped()[0].path, "bad.html");

        let graph = serde_json::to_value(site.graph()).unwrap();
        assert_eq!(graph["skipped"][0]["kind"], "page");
    }
}
