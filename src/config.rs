//! Site configuration module.
//!
//! Handles loading and merging the optional `_config.yml` at the source root.
//! Configuration is layered: stock defaults are overridden by whatever the
//! user file sets, and the merged mapping is handed to renderers unchanged.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── _config.yml          # Optional, merged over the stock defaults
//! ├── _layouts/
//! ├── _posts/
//! └── ...
//! ```
//!
//! A path ending in `.toml` is read as TOML instead of YAML and folded into the
//! same mapping representation.
//!
//! ## Recognized Keys
//!
//! ```yaml
//! layout_dir: _layouts        # Layout templates
//! posts_dir: _posts           # Dated posts
//! include_dir: _includes      # Template includes (used only if present)
//! site_dir: _site             # Output directory
//! processor_name: markdown    # Renderer to resolve from the registry
//! processor_args: {}          # Passed to the renderer factory
//! post_extensions: [md, markdown, textile, html, htm]
//! page_extensions: [html, htm, md, markdown, textile]
//! ```
//!
//! Any other key is kept in the merged mapping for templates to consume.
//!
//! ## Failure Policy
//!
//! The config file is never mandatory. An absent file, an unreadable file, a
//! file that does not parse, or one whose recognized keys have the wrong type
//! all fall back to the stock defaults. The reason is logged, not returned.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Config file name looked up in the source root when no override is given.
pub const DEFAULT_CONFIG_FILE: &str = "_config.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config root must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Directory conventions and renderer selection read out of the merged config.
///
/// Every field has a default, so a config that sets nothing still yields a
/// complete set of conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    pub layout_dir: String,
    pub posts_dir: String,
    pub include_dir: String,
    pub site_dir: String,
    pub processor_name: String,
    pub processor_args: Value,
    pub post_extensions: Vec<String>,
    pub page_extensions: Vec<String>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            layout_dir: "_layouts".to_string(),
            posts_dir: "_posts".to_string(),
            include_dir: "_includes".to_string(),
            site_dir: "_site".to_string(),
            processor_name: "markdown".to_string(),
            processor_args: Value::Mapping(Mapping::new()),
            post_extensions: ["md", "markdown", "textile", "html", "htm"]
                .into_iter()
                .map(String::from)
                .collect(),
            page_extensions: ["html", "htm", "md", "markdown", "textile"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Conventions {
    /// Whether `ext` (without the dot) is a recognized post extension.
    pub fn is_post_extension(&self, ext: &str) -> bool {
        contains_ignore_case(&self.post_extensions, ext)
    }

    /// Whether `ext` (without the dot) is a recognized page extension.
    pub fn is_page_extension(&self, ext: &str) -> bool {
        contains_ignore_case(&self.page_extensions, ext)
    }
}

fn contains_ignore_case(list: &[String], ext: &str) -> bool {
    list.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// The configuration of one build: the merged mapping plus its typed view.
#[derive(Debug, Clone, Serialize)]
pub struct SiteConfig {
    /// Stock defaults with the user document merged on top.
    pub merged: Mapping,
    /// Typed view of the recognized keys.
    pub conventions: Conventions,
    /// The file the user mapping came from, if one was read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            merged: stock_defaults(),
            conventions: Conventions::default(),
            source_file: None,
        }
    }
}

impl SiteConfig {
    /// Look up a top-level key in the merged mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.merged.get(key)
    }

    /// Override the output directory, as the CLI `--destination` flag does.
    pub fn set_site_dir(&mut self, dir: impl Into<String>) {
        let dir = dir.into();
        self.merged
            .insert(Value::from("site_dir"), Value::from(dir.clone()));
        self.conventions.site_dir = dir;
    }
}

// =============================================================================
// Config loading and merging
// =============================================================================

/// Returns the stock default config as a YAML mapping.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults() -> Mapping {
    match serde_yaml::to_value(Conventions::default()) {
        Ok(Value::Mapping(map)) => map,
        _ => Mapping::new(),
    }
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Mappings are merged key-by-key (overlay keys override base keys).
/// - Non-mapping values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config document as a raw mapping.
///
/// Returns `Ok(None)` if the file does not exist. An empty document is an
/// empty mapping.
pub fn load_raw_config(path: &Path) -> Result<Option<Mapping>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: Value = if is_toml(path) {
        let table: toml::Value = toml::from_str(&content)?;
        serde_yaml::to_value(table)?
    } else {
        serde_yaml::from_str(&content)?
    };
    match value {
        Value::Mapping(map) => Ok(Some(map)),
        Value::Null => Ok(Some(Mapping::new())),
        Value::Sequence(_) => Err(ConfigError::NotAMapping("a sequence")),
        _ => Err(ConfigError::NotAMapping("a scalar")),
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

/// Merge an optional user mapping over the stock defaults and deserialize the
/// recognized keys.
pub fn resolve_config(overlay: Option<Mapping>) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_values(Value::Mapping(stock_defaults()), Value::Mapping(ov)),
        None => Value::Mapping(stock_defaults()),
    };
    let conventions: Conventions = serde_yaml::from_value(merged.clone())?;
    let merged = match merged {
        Value::Mapping(map) => map,
        _ => stock_defaults(),
    };
    Ok(SiteConfig {
        merged,
        conventions,
        source_file: None,
    })
}

/// Resolve a command-line output directory. Relative paths are taken from the
/// current directory, unlike `site_dir` in the config file, which is relative
/// to the source root.
pub fn resolve_destination(dest: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(dest)
}

/// Load the site config for a source root.
///
/// `override_path` is resolved relative to `root` when it is not absolute;
/// without it, `_config.yml` in `root` is used. Never fails: any problem with
/// the file yields the stock defaults.
pub fn load_config(root: &Path, override_path: Option<&Path>) -> SiteConfig {
    let path = match override_path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => root.join(p),
        None => root.join(DEFAULT_CONFIG_FILE),
    };

    let overlay = match load_raw_config(&path) {
        Ok(Some(map)) => Some(map),
        Ok(None) => {
            debug!(path = %path.display(), "no config file, using defaults");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
            None
        }
    };
    let read = overlay.is_some();

    match resolve_config(overlay) {
        Ok(mut config) => {
            if read {
                config.source_file = Some(path);
            }
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid config values, using defaults");
            SiteConfig::default()
        }
    }
}

/// Returns a fully-commented stock `_config.yml` with every recognized key.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_yaml() -> &'static str {
    r##"# sitegraph configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Keys not listed here are kept and handed to the renderer untouched.

# Directory holding layout templates. A layout may name a parent layout
# in its own front matter (`layout: base`).
layout_dir: _layouts

# Directory holding dated posts named YYYY-MM-DD-slug.ext.
posts_dir: _posts

# Directory holding template includes. Ignored when it does not exist.
include_dir: _includes

# Output directory. Never scanned for pages or assets.
site_dir: _site

# Renderer used for posts and pages: `markdown` or `passthrough`.
processor_name: markdown

# Arguments passed to the renderer. The markdown renderer understands
# `extensions: [tables, footnotes, strikethrough, tasklists]`.
processor_args: {}

# File extensions recognized for posts and pages.
post_extensions: [md, markdown, textile, html, htm]
page_extensions: [html, htm, md, markdown, textile]
"##
}
