//! Post, page, and asset collectors.
//!
//! Each collector walks part of the source tree, builds one content object per
//! candidate, and claims the candidate's path in the shared [`Classifier`].
//! They must run in order: posts after layouts, pages after posts, assets
//! after pages, because each one skips whatever an earlier one claimed.
//!
//! A candidate that fails to build is not fatal. It is left out of the
//! collection, logged, and recorded as a [`Skipped`] diagnostic next to the
//! items that did build.

use crate::classifier::{Claim, Classifier, ContentKind};
use crate::config::Conventions;
use crate::content::{Asset, ContentError, Page, Post};
use crate::naming::{PostName, parse_post_name};
use crate::walk::{self, WalkError};
use serde::Serialize;
use std::path::{Component, Path};
use tracing::{debug, info, warn};

/// A candidate that was left out, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub path: String,
    pub kind: ContentKind,
    pub reason: String,
}

/// The outcome of one collector pass.
#[derive(Debug, Clone, Serialize)]
pub struct Collected<T> {
    pub items: Vec<T>,
    pub skipped: Vec<Skipped>,
}

impl<T> Default for Collected<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Collected<T> {
    fn accept(&mut self, item: T) {
        self.items.push(item);
    }

    fn skip(&mut self, path: &str, kind: ContentKind, err: &ContentError) {
        warn!(path = %path, kind = %kind, error = %err, "skipping candidate");
        self.skipped.push(Skipped {
            path: path.to_string(),
            kind,
            reason: err.to_string(),
        });
    }
}

fn claim(classifier: &mut Classifier, path: &str, kind: ContentKind) {
    if let Claim::Shadowed(owner) = classifier.claim(path, kind) {
        debug!(path = %path, owner = %owner, wanted = %kind, "path already claimed");
    }
}

/// Collect dated posts under `root/conventions.posts_dir`.
///
/// Only file names of the exact form `YYYY-MM-DD-slug.ext`, with `ext` a
/// recognized post extension, are candidates. The result keeps enumeration
/// order; sort by date where chronology matters.
pub fn posts(
    root: &Path,
    conventions: &Conventions,
    classifier: &mut Classifier,
) -> Result<Collected<Post>, WalkError> {
    let dir = root.join(&conventions.posts_dir);
    let mut collected = Collected::default();

    for rel in walk::relative_files(root, &dir)? {
        let ext_ok = walk::extension(&rel).is_some_and(|e| conventions.is_post_extension(e));
        if !ext_ok || classifier.is_claimed(&rel) {
            continue;
        }
        // Anything not shaped like a post is not a post candidate at all.
        let Some(name) = parse_post_name(walk::file_name(&rel)) else {
            continue;
        };
        if let PostName::InvalidDate { raw } = name {
            collected.skip(&rel, ContentKind::Post, &ContentError::InvalidDate(raw));
            continue;
        }

        match Post::from_file(root, &conventions.posts_dir, &rel) {
            Ok(post) => {
                debug!(path = %rel, slug = %post.slug, "collected post");
                claim(classifier, &rel, ContentKind::Post);
                collected.accept(post);
            }
            Err(e) => collected.skip(&rel, ContentKind::Post, &e),
        }
    }

    info!(
        count = collected.items.len(),
        skipped = collected.skipped.len(),
        "posts collected"
    );
    Ok(collected)
}

/// Collect pages anywhere under `root`.
///
/// Candidates have a recognized page extension, are not yet claimed, are not
/// private (no `_` or `.` component), are not inside the output directory, and
/// are not post-shaped names under the posts directory.
pub fn pages(
    root: &Path,
    conventions: &Conventions,
    classifier: &mut Classifier,
) -> Result<Collected<Page>, WalkError> {
    let reserved = Reserved::new(root, conventions);
    let mut collected = Collected::default();

    for rel in walk::relative_files(root, root)? {
        let ext_ok = walk::extension(&rel).is_some_and(|e| conventions.is_page_extension(e));
        if !ext_ok || reserved.contains(&rel) || classifier.is_claimed(&rel) {
            continue;
        }

        match Page::from_file(root, &rel) {
            Ok(page) => {
                debug!(path = %rel, "collected page");
                claim(classifier, &rel, ContentKind::Page);
                collected.accept(page);
            }
            Err(e) => collected.skip(&rel, ContentKind::Page, &e),
        }
    }

    info!(
        count = collected.items.len(),
        skipped = collected.skipped.len(),
        "pages collected"
    );
    Ok(collected)
}

/// Collect every remaining public file under `root` as an asset.
///
/// A page candidate that failed to build is still unclaimed, and is picked up
/// here as an asset. A post candidate that failed is not. Asset construction
/// cannot fail.
pub fn assets(
    root: &Path,
    conventions: &Conventions,
    classifier: &mut Classifier,
) -> Result<Collected<Asset>, WalkError> {
    let reserved = Reserved::new(root, conventions);
    let mut collected = Collected::default();

    for rel in walk::relative_files(root, root)? {
        if reserved.contains(&rel) || classifier.is_claimed(&rel) {
            continue;
        }
        claim(classifier, &rel, ContentKind::Asset);
        collected.accept(Asset::new(rel));
    }

    info!(count = collected.items.len(), "assets collected");
    Ok(collected)
}

/// Paths the page and asset collectors never take, whether or not anything
/// claimed them.
struct Reserved<'a> {
    conventions: &'a Conventions,
    posts_dir: String,
    output_dir: Option<String>,
}

impl<'a> Reserved<'a> {
    fn new(root: &Path, conventions: &'a Conventions) -> Self {
        Self {
            conventions,
            posts_dir: walk::to_slash(Path::new(&conventions.posts_dir)),
            output_dir: output_dir_within(root, &conventions.site_dir),
        }
    }

    fn contains(&self, rel: &str) -> bool {
        walk::is_private(rel)
            || self
                .output_dir
                .as_deref()
                .is_some_and(|out| walk::is_under(rel, out))
            || self.is_post_candidate(rel)
    }

    /// Post-shaped names under the posts directory belong to the post phase
    /// even when they failed to build there.
    fn is_post_candidate(&self, rel: &str) -> bool {
        walk::is_under(rel, &self.posts_dir)
            && walk::extension(rel).is_some_and(|e| self.conventions.is_post_extension(e))
            && parse_post_name(walk::file_name(rel)).is_some()
    }
}

/// The output directory as a path relative to `root`, or `None` when it lies
/// outside the source tree.
fn output_dir_within(root: &Path, site_dir: &str) -> Option<String> {
    let dir = Path::new(site_dir);
    let plain = dir
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if plain {
        return Some(walk::to_slash(dir));
    }
    let root = root.canonicalize().ok()?;
    let dir = root.join(dir).canonicalize().ok()?;
    dir.strip_prefix(&root).ok().map(walk::to_slash)
}
