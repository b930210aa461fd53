//! Helper configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! static_root = "public"      # Directory public paths resolve against
//!
//! [urls]
//! cdn_hostname = "localhost"  # Host used for fully-qualified image URLs
//! images_prefix = "/images"   # Root for absolute image references
//!
//! [imaging]
//! quality = 90                # JPEG quality when rewriting files (1-100)
//! filter = "lanczos3"         # Resampling filter for resize/crop
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, ResampleFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up inside the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Helper configuration loaded from `config.toml`.
///
/// Replaces the application-wide settings object: the static root and CDN
/// host are handed to [`Rewriter`](crate::rewrite::Rewriter) explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelperConfig {
    /// Filesystem directory that public paths (`/images/foo.png`) resolve against.
    pub static_root: PathBuf,
    /// URL rewriting settings.
    pub urls: UrlsConfig,
    /// In-place image transform settings.
    pub imaging: ImagingConfig,
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            static_root: PathBuf::from("public"),
            urls: UrlsConfig::default(),
            imaging: ImagingConfig::default(),
        }
    }
}

impl HelperConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = &self.urls.cdn_hostname;
        if host.is_empty() {
            return Err(ConfigError::Validation(
                "urls.cdn_hostname must not be empty".into(),
            ));
        }
        if host.contains("://") || host.contains('/') {
            return Err(ConfigError::Validation(format!(
                "urls.cdn_hostname must be a bare host, got {host:?}"
            )));
        }
        let prefix = &self.urls.images_prefix;
        if !prefix.starts_with('/') || prefix.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "urls.images_prefix must start with '/' and not end with '/', got {prefix:?}"
            )));
        }
        if self.imaging.quality == 0 || self.imaging.quality > 100 {
            return Err(ConfigError::Validation(
                "imaging.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// Quality used when re-encoding lossy formats in place.
    pub fn quality(&self) -> Quality {
        Quality::new(self.imaging.quality)
    }
}

/// URL rewriting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlsConfig {
    /// Host of fully-qualified URLs, e.g. `cdn.example.com` or `localhost:3000`.
    pub cdn_hostname: String,
    /// Public root that absolute references are placed under.
    pub images_prefix: String,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            cdn_hostname: "localhost".to_string(),
            images_prefix: "/images".to_string(),
        }
    }
}

/// In-place image transform settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagingConfig {
    pub quality: u32,
    pub filter: ResampleFilter,
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
            filter: ResampleFilter::default(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(HelperConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
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
) -> Result<HelperConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: HelperConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// A relative `static_root` is resolved against `dir`, so a config file
/// describes its own site regardless of the working directory.
pub fn load_config(dir: &Path) -> Result<HelperConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    let has_file = overlay.is_some();
    let mut config = resolve_config(stock_defaults_value()?, overlay)?;
    if has_file && config.static_root.is_relative() {
        config.static_root = dir.join(&config.static_root);
    }
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgstamp configuration
# ======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory that public image paths resolve against. A path such as
# /images/foo.png is looked up at <static_root>/images/foo.png.
# Relative values are resolved against the directory holding this file.
static_root = "public"

# ---------------------------------------------------------------------------
# URL rewriting
# ---------------------------------------------------------------------------
[urls]
# Host for fully-qualified image URLs (https://<cdn_hostname>/...).
# A port may be included, e.g. "localhost:3000". No scheme, no path.
cdn_hostname = "localhost"

# Absolute references ("/foo.png") are placed under this public root.
images_prefix = "/images"

# ---------------------------------------------------------------------------
# In-place image transforms (resize, crop)
# ---------------------------------------------------------------------------
[imaging]
# JPEG quality used when a file is written back (1-100).
quality = 90

# Resampling filter: "nearest", "triangle", "catmull_rom", "gaussian", "lanczos3".
filter = "lanczos3"
"##
}
