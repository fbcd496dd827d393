//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; the user's file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [gallery]
//! categories = ["sport"]          # Tabs, in display order
//! default_category = "sport"      # Tab shown first
//! mode = "single"                 # "single" or "grouped"
//! sort = "ascending"              # "ascending" or "reverse-numeric" (grouped only)
//! extensions = ["jpg", "jpeg", "png", "gif", "webp"]
//! on_failure = "empty"            # "empty" or "metadata" (needs [metadata])
//! image_root = "assets/images"    # Images live at <image_root>/<category>/<file>
//!
//! [lister]
//! source = "github"               # "github" or "local"
//! api_url = "https://api.github.com/repos/elijomi/mikira.github.io/contents/assets/images/{category}"
//! timeout_secs = 10
//! user_agent = "tab-gal"
//!
//! [metadata]
//! "photo-01.jpg" = { width = 2048, height = 1538 }
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::generate::{INDEX_PAGE, page_filename};
use crate::listing::ListerSource;
use crate::metadata::MetadataMap;
use crate::resolve::{FailurePolicy, ResolveMode, ResolvePolicy, SortPolicy};
use crate::types::CategoryKey;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Tabs, resolution mode and failure policy.
    pub gallery: GallerySection,
    /// Where directory listings come from.
    pub lister: ListerConfig,
    /// Known dimensions per filename.
    pub metadata: MetadataMap,
}

/// The `[gallery]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GallerySection {
    pub categories: Vec<String>,
    pub default_category: String,
    pub mode: ResolveMode,
    pub sort: SortPolicy,
    /// Recognized extensions, lowercase, without the dot.
    pub extensions: Vec<String>,
    pub on_failure: FailurePolicy,
    pub image_root: String,
}

impl Default for GallerySection {
    fn default() -> Self {
        Self {
            categories: vec!["sport".to_string()],
            default_category: "sport".to_string(),
            mode: ResolveMode::Single,
            sort: SortPolicy::Ascending,
            extensions: ["jpg", "jpeg", "png", "gif", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            on_failure: FailurePolicy::Empty,
            image_root: "assets/images".to_string(),
        }
    }
}

/// The `[lister]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListerConfig {
    pub source: ListerSource,
    /// Contents API URL; `{category}` is replaced with the tab name.
    pub api_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ListerConfig {
    fn default() -> Self {
        Self {
            source: ListerSource::Github,
            api_url: "https://api.github.com/repos/elijomi/mikira.github.io/contents/assets/images/{category}"
                .to_string(),
            timeout_secs: 10,
            user_agent: "tab-gal".to_string(),
        }
    }
}

impl ListerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl GalleryConfig {
    /// Validate cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gallery = &self.gallery;
        if gallery.categories.is_empty() {
            return Err(ConfigError::Validation(
                "gallery.categories must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for category in &gallery.categories {
            if category.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "gallery.categories must not contain empty names".into(),
                ));
            }
            if !seen.insert(category.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "gallery.categories lists '{category}' twice"
                )));
            }
        }
        // Compared case-folded.
        let mut pages: HashMap<String, &str> = HashMap::new();
        for category in &gallery.categories {
            let page = page_filename(&CategoryKey::new(category.as_str())).to_lowercase();
            if page == INDEX_PAGE {
                return Err(ConfigError::Validation(format!(
                    "gallery.categories entry '{category}' would overwrite {INDEX_PAGE}"
                )));
            }
            if let Some(other) = pages.insert(page.clone(), category.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "gallery.categories '{other}' and '{category}' both render to {page}"
                )));
            }
        }
        if !seen.contains(gallery.default_category.as_str()) {
            return Err(ConfigError::Validation(format!(
                "gallery.default_category '{}' is not one of gallery.categories",
                gallery.default_category
            )));
        }
        if gallery.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "gallery.extensions must not be empty".into(),
            ));
        }
        if let Some(bad) = gallery
            .extensions
            .iter()
            .find(|e| e.is_empty() || !e.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
        {
            return Err(ConfigError::Validation(format!(
                "gallery.extensions entry '{bad}' must be lowercase letters/digits without a dot"
            )));
        }
        if gallery.mode == ResolveMode::Single && gallery.sort == SortPolicy::ReverseNumeric {
            return Err(ConfigError::Validation(
                "gallery.sort = \"reverse-numeric\" requires gallery.mode = \"grouped\"".into(),
            ));
        }
        if gallery.on_failure == FailurePolicy::Metadata && self.metadata.is_empty() {
            return Err(ConfigError::Validation(
                "gallery.on_failure = \"metadata\" requires a non-empty [metadata] table".into(),
            ));
        }
        if self.lister.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "lister.timeout_secs must be non-zero".into(),
            ));
        }
        if self.lister.source == ListerSource::Github && !self.lister.api_url.contains("{category}")
        {
            return Err(ConfigError::Validation(
                "lister.api_url must contain a {category} placeholder".into(),
            ));
        }
        Ok(())
    }

    /// Tabs as category keys, in display order.
    pub fn categories(&self) -> Vec<CategoryKey> {
        self.gallery
            .categories
            .iter()
            .map(|c| CategoryKey::new(c.as_str()))
            .collect()
    }

    pub fn default_category(&self) -> CategoryKey {
        CategoryKey::new(self.gallery.default_category.as_str())
    }

    pub fn resolve_policy(&self) -> ResolvePolicy {
        ResolvePolicy {
            mode: self.gallery.mode,
            extensions: self.gallery.extensions.iter().cloned().collect(),
            sort: self.gallery.sort,
            on_failure: self.gallery.on_failure,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for user overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(GalleryConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
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
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
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
) -> Result<GalleryConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in `dir`, falling back to stock defaults.
pub fn load_config(dir: &Path) -> Result<GalleryConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// A fully commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# tab-gal configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Gallery
# ---------------------------------------------------------------------------
[gallery]
# Tabs, in display order. Each tab lists <image_root>/<category>/.
categories = ["sport"]

# Tab shown on first load. Must be one of `categories`.
default_category = "sport"

# "single"  - one record per file, pre-sized from [metadata]
# "grouped" - files sharing a base name merge into one photo;
#             .avif is the preferred encoding, .jpg/.jpeg the fallback
mode = "single"

# "ascending"       - lexicographic by name
# "reverse-numeric" - trailing number descending (img-10, img-2, img-1);
#                     grouped mode only
sort = "ascending"

# Recognized extensions (lowercase, no dot). Add "avif" for grouped mode.
extensions = ["jpg", "jpeg", "png", "gif", "webp"]

# What a tab shows when its listing cannot be fetched:
# "empty"    - nothing
# "metadata" - the filenames in [metadata] (the table must not be empty)
on_failure = "empty"

# Path or URL prefix the images are served from.
image_root = "assets/images"

# ---------------------------------------------------------------------------
# Directory lister
# ---------------------------------------------------------------------------
[lister]
# "github" - contents API at api_url
# "local"  - read <image_root>/<category>/ from disk
source = "github"
api_url = "https://api.github.com/repos/elijomi/mikira.github.io/contents/assets/images/{category}"
timeout_secs = 10
user_agent = "tab-gal"

# ---------------------------------------------------------------------------
# Known dimensions (generate with `tab-gal probe <dir>`)
# ---------------------------------------------------------------------------
[metadata]
# "photo-01.jpg" = { width = 2048, height = 1538 }
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dimensions;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_single_mode_sport() {
        let config = GalleryConfig::default();
        assert_eq!(config.gallery.categories, vec!["sport"]);
        assert_eq!(config.gallery.default_category, "sport");
        assert_eq!(config.gallery.mode, ResolveMode::Single);
        assert_eq!(config.gallery.sort, SortPolicy::Ascending);
        assert_eq!(config.gallery.on_failure, FailurePolicy::Empty);
        assert!(config.metadata.is_empty());
    }

    #[test]
    fn default_extensions_exclude_avif() {
        let config = GalleryConfig::default();
        assert_eq!(
            config.gallery.extensions,
            vec!["jpg", "jpeg", "png", "gif", "webp"]
        );
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(GalleryConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_grouped_deployment() {
        let toml = r#"
[gallery]
categories = ["sport", "portrait"]
default_category = "portrait"
mode = "grouped"
sort = "reverse-numeric"
extensions = ["jpg", "jpeg", "png", "gif", "webp", "avif"]
on_failure = "empty"
"#;
        let config: GalleryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.gallery.mode, ResolveMode::Grouped);
        assert_eq!(config.gallery.sort, SortPolicy::ReverseNumeric);
        assert_eq!(config.gallery.on_failure, FailurePolicy::Empty);
        assert_eq!(config.default_category(), CategoryKey::new("portrait"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_metadata_table() {
        let toml = r#"
[metadata]
"photo-01.jpg" = { width = 2048, height = 1538 }
"#;
        let config: GalleryConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.metadata["photo-01.jpg"],
            Dimensions {
                width: 2048,
                height: 1538
            }
        );
    }

    #[test]
    fn parse_local_lister() {
        let toml = r#"
[lister]
source = "local"
"#;
        let config: GalleryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.lister.source, ListerSource::Local);
        assert_eq!(config.lister.timeout_secs, 10);
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<GalleryConfig, _> = toml::from_str("[gallery]\nmod = \"single\"\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<GalleryConfig, _> = toml::from_str("[galery]\nmode = \"single\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_sort_policy_rejected() {
        let result: Result<GalleryConfig, _> = toml::from_str("[gallery]\nsort = \"random\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_default_category_must_be_listed() {
        let mut config = GalleryConfig::default();
        config.gallery.default_category = "travel".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_category"));
    }

    #[test]
    fn validate_duplicate_categories() {
        let mut config = GalleryConfig::default();
        config.gallery.categories = vec!["sport".into(), "sport".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_category_named_index() {
        let mut config = GalleryConfig::default();
        config.gallery.categories = vec!["sport".into(), "index".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("would overwrite index.html"));

        config.gallery.categories = vec!["sport".into(), "Index".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_categories_sharing_a_page() {
        let mut config = GalleryConfig::default();
        config.gallery.categories = vec!["sport".into(), "a b".into(), "a-b".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("both render to a-b.html"));

        config.gallery.categories = vec!["sport".into(), "Travel".into(), "travel".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_metadata_fallback_needs_table() {
        let mut config = GalleryConfig::default();
        config.gallery.on_failure = FailurePolicy::Metadata;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[metadata]"));

        config.metadata.insert(
            "photo-01.jpg".into(),
            Dimensions {
                width: 2048,
                height: 1538,
            },
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_empty_categories() {
        let mut config = GalleryConfig::default();
        config.gallery.categories.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_extension_with_dot() {
        let mut config = GalleryConfig::default();
        config.gallery.extensions = vec![".jpg".into()];
        assert!(config.validate().is_err());

        config.gallery.extensions = vec!["JPG".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_reverse_numeric_needs_grouped_mode() {
        let mut config = GalleryConfig::default();
        config.gallery.sort = SortPolicy::ReverseNumeric;
        assert!(config.validate().is_err());

        config.gallery.mode = ResolveMode::Grouped;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_api_url_placeholder() {
        let mut config = GalleryConfig::default();
        config.lister.api_url = "https://example.com/contents/sport".to_string();
        assert!(config.validate().is_err());

        // Local listers never touch the URL.
        config.lister.source = ListerSource::Local;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_zero_timeout() {
        let mut config = GalleryConfig::default();
        config.lister.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_policy_mirrors_gallery_section() {
        let mut config = GalleryConfig::default();
        config.gallery.extensions.push("avif".into());
        let policy = config.resolve_policy();
        assert_eq!(policy.mode, ResolveMode::Single);
        assert!(policy.extensions.contains("avif"));
        assert!(policy.extensions.contains("jpeg"));
    }

    // =========================================================================
    // load_config / merge tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.gallery.default_category, "sport");
    }

    #[test]
    fn load_config_merges_over_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[gallery]
categories = ["sport", "concerts"]

[lister]
timeout_secs = 3
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.gallery.categories, vec!["sport", "concerts"]);
        assert_eq!(config.lister.timeout_secs, 3);
        // Untouched keys keep their defaults
        assert_eq!(config.lister.user_agent, "tab-gal");
        assert_eq!(config.gallery.image_root, "assets/images");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "not [[[ toml").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[gallery]\ndefault_category = \"nowhere\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_toml_arrays_replace_wholesale() {
        let base: toml::Value = toml::from_str("[gallery]\nextensions = [\"jpg\", \"png\"]\n").unwrap();
        let overlay: toml::Value = toml::from_str("[gallery]\nextensions = [\"avif\"]\n").unwrap();
        let merged = merge_toml(base, overlay);
        let exts = merged["gallery"]["extensions"].as_array().unwrap();
        assert_eq!(exts.len(), 1);
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("a = 10\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(10));
        assert_eq!(merged["b"].as_integer(), Some(2));
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.get("gallery").is_some());
        assert!(val.get("lister").is_some());
        assert!(val.get("metadata").is_some());
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: GalleryConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = GalleryConfig::default();
        assert_eq!(config.gallery.categories, defaults.gallery.categories);
        assert_eq!(config.gallery.extensions, defaults.gallery.extensions);
        assert_eq!(config.gallery.mode, defaults.gallery.mode);
        assert_eq!(config.lister.api_url, defaults.lister.api_url);
        assert!(config.metadata.is_empty());
        assert!(config.validate().is_ok());
    }
}
