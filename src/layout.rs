//! Layout registry.
//!
//! Layouts live under the layout directory (`_layouts` by default) and are
//! named by their path relative to it, minus the final extension:
//!
//! ```text
//! _layouts/default.html     → default
//! _layouts/blog/post.html   → blog/post
//! ```
//!
//! A layout may name a parent in its own header (`layout: default`); rendering
//! through a layout then continues through the parent, up to a root layout with
//! no parent. Loading runs in two passes so that a parent may be discovered
//! after its child: every file is read and named first, then parents are
//! linked and the whole graph is checked for missing names and cycles. Either
//! problem fails the load; there is no partially linked registry.

use crate::classifier::{Classifier, ContentKind};
use crate::frontmatter::{self, FrontmatterError, Metadata};
use crate::naming::strip_extension;
use crate::walk::{self, WalkError};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("cannot read layout {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid header in layout {path}: {source}")]
    Header {
        path: String,
        #[source]
        source: FrontmatterError,
    },
    #[error("layout '{layout}' names parent '{parent}', which does not exist")]
    MissingParent { layout: String, parent: String },
    #[error("layout inheritance cycle: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },
}

/// One layout template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Name used by `layout:` references.
    pub name: String,
    /// Source path relative to the site root.
    pub path: String,
    pub metadata: Metadata,
    /// Template source with the header removed.
    pub body: String,
    /// Linked parent layout name, set only once the parent is known to exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// All layouts of a site, keyed by name.
#[derive(Debug, Default, Clone, Serialize)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, Layout>,
}

impl LayoutRegistry {
    /// Read, name, and link every layout under `root/layout_dir`.
    ///
    /// Each layout's path is claimed as [`ContentKind::Layout`].
    pub fn load(
        root: &Path,
        layout_dir: &str,
        classifier: &mut Classifier,
    ) -> Result<Self, LayoutError> {
        let dir = root.join(layout_dir);
        let prefix = walk::to_slash(Path::new(layout_dir));

        let mut layouts = BTreeMap::new();
        for rel in walk::relative_files(root, &dir)? {
            let content = fs::read_to_string(root.join(&rel)).map_err(|source| {
                LayoutError::Read {
                    path: rel.clone(),
                    source,
                }
            })?;
            let doc = frontmatter::parse(&content).map_err(|source| LayoutError::Header {
                path: rel.clone(),
                source,
            })?;

            let within = rel
                .strip_prefix(prefix.as_str())
                .map(|r| r.trim_start_matches('/'))
                .unwrap_or(rel.as_str());
            let name = strip_extension(within).to_string();

            debug!(name = %name, path = %rel, "loaded layout");
            classifier.claim(&rel, ContentKind::Layout);
            layouts.insert(
                name.clone(),
                Layout {
                    name,
                    path: rel,
                    metadata: doc.metadata,
                    body: doc.body,
                    parent: None,
                },
            );
        }

        let mut registry = Self { layouts };
        registry.link()?;
        info!(count = registry.len(), "layouts loaded");
        Ok(registry)
    }

    /// Build a registry from already-parsed layouts and link it.
    pub fn from_layouts(layouts: impl IntoIterator<Item = Layout>) -> Result<Self, LayoutError> {
        let mut registry = Self {
            layouts: layouts.into_iter().map(|l| (l.name.clone(), l)).collect(),
        };
        registry.link()?;
        Ok(registry)
    }

    /// Second pass: attach declared parents, then reject cycles.
    fn link(&mut self) -> Result<(), LayoutError> {
        let names: BTreeSet<String> = self.layouts.keys().cloned().collect();
        for layout in self.layouts.values_mut() {
            layout.parent = match &layout.metadata.layout {
                Some(parent) if names.contains(parent) => Some(parent.clone()),
                Some(parent) => {
                    return Err(LayoutError::MissingParent {
                        layout: layout.name.clone(),
                        parent: parent.clone(),
                    });
                }
                None => None,
            };
        }

        for name in self.layouts.keys() {
            self.walk_chain(name)?;
        }
        Ok(())
    }

    /// Names from `name` up to its root, failing on a repeated name.
    fn walk_chain(&self, name: &str) -> Result<Vec<&Layout>, LayoutError> {
        let mut chain: Vec<&Layout> = Vec::new();
        let mut next = self.layouts.get(name);
        while let Some(layout) = next {
            if chain.iter().any(|l| l.name == layout.name) {
                let mut names: Vec<String> = chain.iter().map(|l| l.name.clone()).collect();
                names.push(layout.name.clone());
                return Err(LayoutError::Cycle { chain: names });
            }
            chain.push(layout);
            next = layout.parent.as_deref().and_then(|p| self.layouts.get(p));
        }
        Ok(chain)
    }

    pub fn get(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    /// The linked parent of `name`, if it has one.
    pub fn parent(&self, name: &str) -> Option<&Layout> {
        self.get(name)
            .and_then(|l| l.parent.as_deref())
            .and_then(|p| self.get(p))
    }

    /// The inheritance chain starting at `name`, innermost first.
    ///
    /// Empty if `name` is not registered. Linking already rejected cycles, so
    /// the walk always terminates.
    pub fn chain(&self, name: &str) -> Vec<&Layout> {
        self.walk_chain(name).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Layouts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.values()
    }
}
