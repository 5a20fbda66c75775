//! Writing a rendered site to disk.
//!
//! Final stage of a build. Rendered posts and pages are written to their
//! output paths and assets are copied byte-for-byte:
//!
//! ```text
//! _site/
//! ├── 2024/01/01/hello.html      # post, from _posts/2024-01-01-hello.md
//! ├── about.html                 # page, from about.html
//! ├── docs/guide.html            # page, from docs/guide.md
//! └── robots.txt                 # asset, copied
//! ```

use crate::content::Asset;
use crate::render::RenderedObject;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Counts of what a write produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub rendered: usize,
    pub copied: usize,
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    Ok(())
}

/// Write rendered objects and copy assets from `source` into `output_dir`.
pub fn write_site(
    rendered: &[RenderedObject],
    assets: &[Asset],
    source: &Path,
    output_dir: &Path,
) -> Result<WriteSummary, WriteError> {
    fs::create_dir_all(output_dir).map_err(io_err(output_dir))?;
    let mut summary = WriteSummary::default();

    for object in rendered {
        let dest = output_dir.join(&object.output_path);
        ensure_parent(&dest)?;
        fs::write(&dest, &object.bytes).map_err(io_err(&dest))?;
        debug!(output = %object.output_path, "wrote");
        summary.rendered += 1;
    }

    for asset in assets {
        let from = source.join(&asset.path);
        let dest = output_dir.join(&asset.path);
        ensure_parent(&dest)?;
        fs::copy(&from, &dest).map_err(io_err(&from))?;
        debug!(output = %asset.path, "copied");
        summary.copied += 1;
    }

    info!(
        rendered = summary.rendered,
        copied = summary.copied,
        dir = %output_dir.display(),
        "site written"
    );
    Ok(summary)
}
