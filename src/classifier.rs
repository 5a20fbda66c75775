//! Path classification shared by every collector.
//!
//! Each source path belongs to at most one [`ContentKind`]. The first
//! collector to claim a path wins; later claims, with the same kind or a
//! different one, leave the original entry untouched. Collectors run in a fixed
//! order (layouts, posts, pages, assets), so earlier kinds shadow later ones.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The four mutually exclusive kinds a source path can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Layout,
    Post,
    Page,
    Asset,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Layout => "layout",
            Self::Post => "post",
            Self::Page => "page",
            Self::Asset => "asset",
        })
    }
}

/// What happened when a collector tried to claim a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The path was unclaimed and now belongs to the requested kind.
    Claimed,
    /// The path already belonged to this kind.
    AlreadyOwned,
    /// The path belongs to another kind, which is kept.
    Shadowed(ContentKind),
}

/// Registry of claimed paths.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct Classifier {
    claims: BTreeMap<String, ContentKind>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as `kind` unless some kind already owns it.
    pub fn claim(&mut self, path: &str, kind: ContentKind) -> Claim {
        match self.claims.get(path) {
            Some(&existing) if existing == kind => Claim::AlreadyOwned,
            Some(&existing) => Claim::Shadowed(existing),
            None => {
                self.claims.insert(path.to_string(), kind);
                Claim::Claimed
            }
        }
    }

    pub fn is_claimed(&self, path: &str) -> bool {
        self.claims.contains_key(path)
    }

    pub fn kind_of(&self, path: &str) -> Option<ContentKind> {
        self.claims.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// All claims, in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ContentKind)> {
        self.claims.iter().map(|(p, k)| (p.as_str(), *k))
    }

    /// Number of paths claimed by `kind`.
    pub fn count(&self, kind: ContentKind) -> usize {
        self.claims.values().filter(|&&k| k == kind).count()
    }
}
