//! Content objects produced by the collectors.
//!
//! Posts and pages are read and parsed once, when collected, and are not
//! modified afterwards. They refer to their layout by name; the site resolves
//! that name against its [`LayoutRegistry`](crate::layout::LayoutRegistry)
//! when rendering. Assets are opaque and never read during collection.

use crate::frontmatter::{self, FrontmatterError, Metadata};
use crate::naming::{DatedName, PostName, parse_post_name};
use crate::walk;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Why a single post or page candidate could not be built.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Header(#[from] FrontmatterError),
    #[error("'{0}' is not a valid date")]
    InvalidDate(String),
    #[error("filename does not match YYYY-MM-DD-slug.ext")]
    NotDated,
}

/// One dated post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Source path relative to the site root.
    pub path: String,
    pub date: NaiveDate,
    pub slug: String,
    /// Extension of the source file, without the dot.
    pub ext: String,
    /// Sub-directories between the posts directory and the file.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    pub metadata: Metadata,
    #[serde(skip)]
    pub body: String,
}

impl Post {
    /// Read and parse the post at `root/path`.
    ///
    /// `posts_dir` is the posts directory relative to `root`; directories
    /// between it and the file become categories.
    pub fn from_file(root: &Path, posts_dir: &str, path: &str) -> Result<Self, ContentError> {
        let name = match parse_post_name(walk::file_name(path)) {
            Some(PostName::Valid(name)) => name,
            Some(PostName::InvalidDate { raw }) => return Err(ContentError::InvalidDate(raw)),
            None => return Err(ContentError::NotDated),
        };
        let content = fs::read_to_string(root.join(path))?;
        Self::from_parts(path, posts_dir, name, &content)
    }

    fn from_parts(
        path: &str,
        posts_dir: &str,
        name: DatedName,
        content: &str,
    ) -> Result<Self, ContentError> {
        let doc = frontmatter::parse(content)?;
        Ok(Self {
            path: path.to_string(),
            date: name.date,
            slug: name.slug,
            ext: name.ext,
            categories: categories_for(path, posts_dir),
            metadata: doc.metadata,
            body: doc.body,
        })
    }

    /// Layout named in the post header.
    pub fn layout(&self) -> Option<&str> {
        self.metadata.layout.as_deref()
    }

    /// Title from the header, or the slug with dashes as spaces.
    pub fn title(&self) -> String {
        self.metadata
            .title
            .clone()
            .unwrap_or_else(|| self.slug.replace('-', " "))
    }

    /// Site-relative URL: `/YYYY/MM/DD/slug.html`, after any categories.
    pub fn url(&self) -> String {
        let mut url = String::new();
        for category in &self.categories {
            url.push('/');
            url.push_str(category);
        }
        url.push_str(&format!(
            "/{:04}/{:02}/{:02}/{}.html",
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.slug
        ));
        url
    }
}

fn categories_for(path: &str, posts_dir: &str) -> Vec<String> {
    let prefix = walk::to_slash(Path::new(posts_dir));
    let within = path
        .strip_prefix(prefix.as_str())
        .map(|r| r.trim_start_matches('/'))
        .unwrap_or(path);
    let mut parts: Vec<String> = within.split('/').map(String::from).collect();
    parts.pop();
    parts
}

/// One free-form page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Source path relative to the site root.
    pub path: String,
    pub ext: String,
    pub metadata: Metadata,
    #[serde(skip)]
    pub body: String,
}

impl Page {
    /// Read and parse the page at `root/path`.
    pub fn from_file(root: &Path, path: &str) -> Result<Self, ContentError> {
        let content = fs::read_to_string(root.join(path))?;
        let doc = frontmatter::parse(&content)?;
        Ok(Self {
            path: path.to_string(),
            ext: walk::extension(path).unwrap_or_default().to_string(),
            metadata: doc.metadata,
            body: doc.body,
        })
    }

    pub fn layout(&self) -> Option<&str> {
        self.metadata.layout.as_deref()
    }

    /// Title from the header, or the file name without extension.
    pub fn title(&self) -> String {
        self.metadata.title.clone().unwrap_or_else(|| {
            crate::naming::strip_extension(walk::file_name(&self.path)).to_string()
        })
    }
}

/// One file copied to the output unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    /// Source path relative to the site root.
    pub path: String,
}

impl Asset {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}
