//! # sitegraph
//!
//! A static site builder. Given a source tree of layouts, dated posts,
//! free-form pages, and static files, it builds an in-memory graph of every
//! artifact the site will emit, resolves layout inheritance, and hands the
//! graph to a renderer chosen by name.
//!
//! # Source Tree
//!
//! ```text
//! site/
//! ├── _config.yml                  # Optional configuration
//! ├── _layouts/
//! │   ├── default.html             # Layout "default"
//! │   └── post.html                # Layout "post" (layout: default)
//! ├── _posts/
//! │   └── 2024-01-01-hello.md      # Post, slug "hello"
//! ├── _includes/                   # Optional includes
//! ├── _drafts/                     # Private: never collected
//! ├── about.html                   # Page
//! └── robots.txt                   # Asset, copied verbatim
//! ```
//!
//! # Build Order
//!
//! Every source path is classified as exactly one of layout, post, page, or
//! asset. Classification runs in a fixed order and the first kind to claim a
//! path keeps it:
//!
//! ```text
//! 1. Layouts  _layouts/**         →  named, parents linked
//! 2. Posts    _posts/**/YYYY-MM-DD-slug.ext
//! 3. Pages    **/*.{html,md,...}  minus claimed and private paths
//! 4. Assets   everything left     minus private paths
//! ```
//!
//! A layout whose parent does not exist aborts the build. A post or page that
//! cannot be read or parsed is skipped and reported; the build goes on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`site`] | The site model: runs the four phases in order and caches them |
//! | [`classifier`] | Path → content kind registry, first claim wins |
//! | [`layout`] | Layout loading, parent linking, inheritance chains |
//! | [`collect`] | Post, page, and asset collectors with skip diagnostics |
//! | [`content`] | `Post`, `Page`, and `Asset` values |
//! | [`frontmatter`] | `---` YAML metadata headers |
//! | [`naming`] | `YYYY-MM-DD-slug.ext` filename parser |
//! | [`walk`] | Recursive file enumeration and private-path rules |
//! | [`config`] | `_config.yml` loading and directory conventions |
//! | [`render`] | Renderer registry, built-in renderers, layout wrapping |
//! | [`write`] | Output directory writer |
//! | [`output`] | CLI output formatting |

pub mod classifier;
pub mod collect;
pub mod config;
pub mod content;
pub mod frontmatter;
pub mod layout;
pub mod naming;
pub mod output;
pub mod render;
pub mod site;
pub mod walk;
pub mod write;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use classifier::{Classifier, ContentKind};
pub use config::SiteConfig;
pub use site::{Site, SiteError};

/// Initialize tracing with the specified verbosity level.
///
/// `verbose` maps 0 → WARN, 1 → INFO, 2 → DEBUG, 3+ → TRACE. `RUST_LOG`
/// directives are honored on top.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
