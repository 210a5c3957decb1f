//! Build configuration.
//!
//! Settings come from three layers, each overriding the previous one:
//!
//! 1. stock defaults ([`SiteConfig::default`]),
//! 2. an optional `treedocs.toml` in the source directory,
//! 3. command-line flags ([`Overrides`]).
//!
//! Layers are merged as TOML tables with [`merge_toml`] before the result is
//! deserialized and validated, so a config file (or the CLI) only needs the
//! keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Docs"       # Shown in the header and in every <title>
//! # index = "getting-started"  # Document used as index.html
//! # include = "guide"       # Only scan directories whose path matches
//! # exclude = "drafts"      # Never scan directories whose path matches
//! hide = []                 # Optional widgets to omit: "search", "toc"
//! assets_dir = "assets"     # Copied verbatim into the output root
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Name of the optional config file looked up in the source directory.
pub const CONFIG_FILE: &str = "treedocs.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("invalid {field} pattern: {source}")]
    Pattern {
        field: &'static str,
        source: regex::Error,
    },
    #[error(
        "The argument \"{0}\" of the parameter --hide is not valid. The values allowed are: search,toc"
    )]
    UnknownWidget(String),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Optional page widgets that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    /// Search box in the header and the search result panel.
    Search,
    /// Table of contents next to the page body.
    Toc,
}

impl Widget {
    pub const ALL: [Widget; 2] = [Widget::Search, Widget::Toc];

    pub fn as_str(self) -> &'static str {
        match self {
            Widget::Search => "search",
            Widget::Toc => "toc",
        }
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Widget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Widget::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownWidget(s.to_string()))
    }
}

/// Parse a comma-separated widget list such as `search,toc`.
///
/// Blank items are ignored; any unrecognized name is an error.
pub fn parse_hide_list(list: &str) -> Result<Vec<Widget>, ConfigError> {
    let mut widgets = Vec::new();
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let widget: Widget = item.parse()?;
        if !widgets.contains(&widget) {
            widgets.push(widget);
        }
    }
    Ok(widgets)
}

/// Site configuration loaded from `treedocs.toml` and the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Title shown at the top of the menu and in every `<title>`.
    pub site_title: String,
    /// File name (with or without extension) of the document used as index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Only directories whose path matches this regex are scanned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    /// Directories whose path matches this regex are skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    /// Optional widgets left out of every page.
    pub hide: Vec<Widget>,
    /// Directory under the source root copied as-is into the output root.
    pub assets_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Docs".to_string(),
            index: None,
            include: None,
            exclude: None,
            hide: Vec::new(),
            assets_dir: "assets".to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate config values; patterns must compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_title must not be empty".into(),
            ));
        }
        if self.assets_dir.trim().is_empty() || Path::new(&self.assets_dir).is_absolute() {
            return Err(ConfigError::Validation(
                "assets_dir must be a relative directory name".into(),
            ));
        }
        self.include_pattern()?;
        self.exclude_pattern()?;
        Ok(())
    }

    pub fn is_hidden(&self, widget: Widget) -> bool {
        self.hide.contains(&widget)
    }

    pub fn include_pattern(&self) -> Result<Option<Regex>, ConfigError> {
        compile_pattern("include", self.include.as_deref())
    }

    pub fn exclude_pattern(&self) -> Result<Option<Regex>, ConfigError> {
        compile_pattern("exclude", self.exclude.as_deref())
    }
}

fn compile_pattern(field: &'static str, pattern: Option<&str>) -> Result<Option<Regex>, ConfigError> {
    pattern
        .filter(|p| !p.is_empty())
        .map(|p| Regex::new(p).map_err(|source| ConfigError::Pattern { field, source }))
        .transpose()
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub site_title: Option<String>,
    pub index: Option<String>,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub hide: Option<Vec<Widget>>,
}

impl Overrides {
    /// Render the set values as a sparse TOML table for merging.
    pub fn to_toml(&self) -> Option<toml::Value> {
        let mut table = toml::map::Map::new();
        let strings = [
            ("site_title", &self.site_title),
            ("index", &self.index),
            ("include", &self.include),
            ("exclude", &self.exclude),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                table.insert(key.to_string(), toml::Value::String(value.clone()));
            }
        }
        if let Some(hide) = &self.hide {
            let items = hide
                .iter()
                .map(|w| toml::Value::String(w.as_str().to_string()))
                .collect();
            table.insert("hide".to_string(), toml::Value::Array(items));
        }
        (!table.is_empty()).then_some(toml::Value::Table(table))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `treedocs.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective configuration for a source directory.
///
/// Stock defaults, then `treedocs.toml` (if present), then `overrides`.
pub fn load_config(source: &Path, overrides: &Overrides) -> Result<SiteConfig, ConfigError> {
    let mut merged = stock_defaults_value()?;
    if let Some(file) = load_raw_config(source)? {
        merged = merge_toml(merged, file);
    }
    resolve_config(merged, overrides.to_toml())
}

/// Returns a fully-commented stock `treedocs.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# treedocs configuration
# ======================
# Place this file in the source directory as treedocs.toml.
# All settings are optional. Values shown below are the defaults.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# Title shown at the top of the menu and in every page <title>.
site_title = "Docs"

# Document used as index.html, matched case-insensitively against the file
# name with or without extension. When unset, a README at the top of the
# source directory is used, otherwise the first document.
# index = "getting-started"

# Regular expressions matched against directory paths.
# A directory matching `exclude` is skipped together with everything below it.
# When `include` is set, directories that do not match it are skipped.
# include = "guide"
# exclude = "drafts|archive"

# Optional widgets to leave out of every page: "search", "toc".
hide = []

# Directory (relative to the source root) copied verbatim into the output root.
assets_dir = "assets"
"##
}
