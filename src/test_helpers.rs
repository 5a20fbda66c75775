//! Shared test utilities for the sitegraph test suite.
//!
//! Provides fixture setup, a small tree writer for ad-hoc source trees, and
//! lookup helpers that panic with the available names on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let mut site = Site::open(tmp.path()).unwrap();
//! site.build().unwrap();
//!
//! let post = find_post(&site, "hello");
//! assert_eq!(post.layout(), Some("default"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::{Page, Post};
use crate::site::Site;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `(relative path, content)` pairs under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
    }
}

// =========================================================================
// Site lookups — panics with a clear message on miss
// =========================================================================

/// Find a collected post by slug. Panics if not found.
pub fn find_post<'a>(site: &'a Site, slug: &str) -> &'a Post {
    site.posts_built()
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = site.posts_built().iter().map(|p| p.slug.as_str()).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a collected page by source path. Panics if not found.
pub fn find_page<'a>(site: &'a Site, path: &str) -> &'a Page {
    site.pages_built()
        .iter()
        .find(|p| p.path == path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = site.pages_built().iter().map(|p| p.path.as_str()).collect();
            panic!("page '{path}' not found. Available: {paths:?}")
        })
}

/// All asset paths in collection order.
pub fn asset_paths(site: &Site) -> Vec<&str> {
    site.assets_built().iter().map(|a| a.path.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_lookups() {
        let tmp = setup_fixtures();
        let mut site = Site::open(tmp.path()).unwrap();
        site.build().unwrap();

        assert_eq!(find_post(&site, "hello").layout(), Some("default"));
        assert_eq!(find_page(&site, "about.html").layout(), Some("default"));
        assert_eq!(asset_paths(&site), vec!["robots.txt"]);
    }

    #[test]
    #[should_panic(expected = "post 'nope' not found")]
    fn find_post_panics_on_miss() {
        let tmp = setup_fixtures();
        let mut site = Site::open(tmp.path()).unwrap();
        site.build().unwrap();
        find_post(&site, "nope");
    }
}
