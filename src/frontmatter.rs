//! YAML metadata headers for layouts, posts, and pages.
//!
//! A file may open with a header fenced by `---` lines:
//!
//! ```text
//! ---
//! layout: default
//! title: Hello
//! ---
//! Body starts here.
//! ```
//!
//! Files without a header have empty metadata and the whole file as body.

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use thiserror::Error;

const DELIMITER: &str = "---";

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("metadata header is never closed")]
    Unclosed,
    #[error("invalid metadata header: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parsed header values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Layout to render through. On a layout, this names its parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Everything else in the header.
    #[serde(default, flatten)]
    pub extra: Mapping,
}

/// A file split into its metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
}

/// Split raw content into header text and body, if a header is present.
///
/// The opening delimiter must be the very first line. Returns
/// `Err(Unclosed)` when it is, but no closing line follows.
pub fn split(content: &str) -> Result<Option<(&str, &str)>, FrontmatterError> {
    let Some(rest) = strip_delimiter_line(content) else {
        return Ok(None);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok(Some((header, body)));
        }
        offset += line.len();
    }
    Err(FrontmatterError::Unclosed)
}

fn strip_delimiter_line(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    if let Some(rest) = rest.strip_prefix("\r\n") {
        Some(rest)
    } else {
        rest.strip_prefix('\n')
    }
}

/// Parse a file's content into a [`Document`].
pub fn parse(content: &str) -> Result<Document, FrontmatterError> {
    match split(content)? {
        None => Ok(Document {
            metadata: Metadata::default(),
            body: content.to_string(),
        }),
        Some((header, body)) => {
            let metadata = if header.trim().is_empty() {
                Metadata::default()
            } else {
                serde_yaml::from_str(header)?
            };
            Ok(Document {
                metadata,
                body: body.to_string(),
            })
        }
    }
}
