//! Filesystem enumeration.
//!
//! Every collector sees the source tree through [`relative_files`]: a sorted
//! list of regular-file paths relative to a root, with `/` separators. Sorting
//! keeps runs reproducible; nothing downstream relies on the order for
//! correctness.

use std::path::{Component, Path};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("cannot read directory {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: walkdir::Error,
    },
}

/// Relative paths of all regular files under `dir`, recursively.
///
/// Paths are relative to `root`, which must be `dir` or one of its ancestors.
/// A `dir` that does not exist yields an empty list.
pub fn relative_files(root: &Path, dir: &Path) -> Result<Vec<String>, WalkError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| WalkError::Unreadable {
            path: source
                .path()
                .unwrap_or(dir)
                .display()
                .to_string(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            files.push(to_slash(rel));
        }
    }
    Ok(files)
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether any component of a relative path starts with `_` or `.`.
///
/// Such paths are private build inputs (`_layouts/`, `_config.yml`,
/// `_drafts/note.md`) or hidden files and never become pages or assets.
pub fn is_private(rel: &str) -> bool {
    rel.split('/')
        .any(|part| part.starts_with('_') || part.starts_with('.'))
}

/// Whether `rel` is `prefix` itself or lies beneath it.
pub fn is_under(rel: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return false;
    }
    rel == prefix
        || rel
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Final component of a relative path.
pub fn file_name(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}

/// Extension of the final component, without the dot.
pub fn extension(rel: &str) -> Option<&str> {
    let name = file_name(rel);
    match name.rfind('.') {
        Some(dot) if dot > 0 => Some(&name[dot + 1..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_nested_files_relative_to_root() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("a/b/c.txt"), "x").unwrap();
        fs::write(tmp.path().join("top.html"), "x").unwrap();

        let files = relative_files(tmp.path(), tmp.path()).unwrap();
        assert_eq!(files, vec!["a/b/c.txt", "top.html"]);
    }

    #[test]
    fn subdirectory_paths_keep_their_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("_posts")).unwrap();
        fs::write(tmp.path().join("_posts/2024-01-01-a.md"), "x").unwrap();

        let files = relative_files(tmp.path(), &tmp.path().join("_posts")).unwrap();
        assert_eq!(files, vec!["_posts/2024-01-01-a.md"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let files = relative_files(tmp.path(), &tmp.path().join("nope")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn private_paths() {
        assert!(is_private("_config.yml"));
        assert!(is_private("_drafts/note.md"));
        assert!(is_private("css/.hidden"));
        assert!(is_private(".git/HEAD"));
        assert!(!is_private("about.html"));
        assert!(!is_private("css/site_main.css"));
    }

    #[test]
    fn under_prefix() {
        assert!(is_under("public/index.html", "public"));
        assert!(is_under("public/index.html", "public/"));
        assert!(!is_under("publication.html", "public"));
        assert!(!is_under("a.html", ""));
    }

    #[test]
    fn name_and_extension() {
        assert_eq!(file_name("a/b/c.tar.gz"), "c.tar.gz");
        assert_eq!(extension("a/b/c.tar.gz"), Some("gz"));
        assert_eq!(extension("robots.txt"), Some("txt"));
        assert_eq!(extension("Makefile"), None);
        assert_eq!(extension("dir/.htaccess"), None);
    }
}
