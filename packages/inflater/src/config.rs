//! Configuration constants, naming validation and the YAML inflater config.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{InflaterError, Result};

/// Pseudo-root tag whose children are spliced into the supplied parent.
pub const TAG_MERGE: &str = "merge";

/// Directive tag that requests focus on the enclosing element.
pub const TAG_REQUEST_FOCUS: &str = "requestFocus";

/// Sentinel tag whose real type name comes from its `class` attribute.
pub const TAG_VIEW: &str = "view";

/// Attribute carrying the type name of a `<view>` tag.
pub const VIEW_CLASS_ATTRIBUTE: &str = "class";

/// Separator between namespace segments of a fully-qualified type name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Built-in prefixes tried, in order, for tags without a namespace.
pub const DEFAULT_PREFIXES: [&str; 3] = ["ui.widget.", "ui.web.", "ui.view."];

/// Fully-qualified type name: dotted identifiers.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TYPE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)*$").expect("valid regex")
});

/// Namespace prefix: one or more identifiers, each followed by a dot.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PREFIX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*\.)+$").expect("valid regex")
});

/// Validate a type name used for registration.
///
/// # Examples
/// ```
/// use layout_inflater::config::validate_type_name;
///
/// assert!(validate_type_name("ui.widget.TextView").is_ok());
/// assert!(validate_type_name("TextView").is_ok());
/// assert!(validate_type_name("ui..TextView").is_err());
/// ```
pub fn validate_type_name(name: &str) -> Result<()> {
    if TYPE_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(InflaterError::InvalidTypeName(name.to_string()))
    }
}

/// Validate a namespace prefix.
///
/// # Examples
/// ```
/// use layout_inflater::config::validate_prefix;
///
/// assert!(validate_prefix("ui.widget.").is_ok());
/// assert!(validate_prefix("ui.widget").is_err());
/// ```
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if PREFIX_PATTERN.is_match(prefix) {
        Ok(())
    } else {
        Err(InflaterError::InvalidTypeName(prefix.to_string()))
    }
}

/// Whether a tag name is already namespaced.
#[must_use]
pub fn is_qualified(name: &str) -> bool {
    name.contains(NAMESPACE_SEPARATOR)
}

/// The default prefix list as owned strings.
#[must_use]
pub fn default_prefixes() -> Vec<String> {
    DEFAULT_PREFIXES.iter().map(|p| (*p).to_string()).collect()
}

/// One layout file entry in the config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayoutEntry {
    /// Resource id, as written in the config (hex or decimal).
    pub id: String,
    /// Path to the layout markup, relative to the config file.
    pub path: PathBuf,
}

/// Inflater configuration loaded from YAML.
///
/// ```yaml
/// prefixes:
///   - ui.widget.
///   - ui.view.
/// layouts:
///   - id: "0x7f030000"
///     path: layouts/main.xml
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InflaterConfig {
    /// Built-in prefixes in resolution order.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// Layout resources.
    #[serde(default)]
    pub layouts: Vec<LayoutEntry>,

    /// Directory the layout paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for InflaterConfig {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            layouts: Vec::new(),
            base_dir: PathBuf::new(),
        }
    }
}

impl InflaterConfig {
    /// Parse a config from YAML text and validate its prefixes.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; layout paths resolve relative to its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&text)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        tracing::debug!(
            path = %path.display(),
            prefixes = config.prefixes.len(),
            layouts = config.layouts.len(),
            "Loaded inflater config"
        );
        Ok(config)
    }

    /// Check every prefix against the naming scheme.
    pub fn validate(&self) -> Result<()> {
        for prefix in &self.prefixes {
            validate_prefix(prefix)?;
        }
        Ok(())
    }

    /// Resolved layout paths keyed by their raw id strings.
    #[must_use]
    pub fn layout_paths(&self) -> BTreeMap<&str, PathBuf> {
        self.layouts
            .iter()
            .map(|entry| (entry.id.as_str(), self.base_dir.join(&entry.path)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_type_name() {
        assert!(validate_type_name("ui.widget.TextView").is_ok());
        assert!(validate_type_name("Outer$Inner").is_ok());
        assert!(validate_type_name("").is_err());
        assert!(validate_type_name("1abc").is_err());
        assert!(validate_type_name("ui.widget.").is_err());
    }

    #[test]
    fn test_validate_prefix() {
        assert!(validate_prefix("ui.").is_ok());
        assert!(validate_prefix("com.example.views.").is_ok());
        assert!(validate_prefix(".ui.").is_err());
        assert!(validate_prefix("").is_err());
    }

    #[test]
    fn test_is_qualified() {
        assert!(is_qualified("ui.widget.Button"));
        assert!(!is_qualified("Button"));
    }

    #[test]
    fn test_config_defaults() {
        let config = InflaterConfig::from_yaml("{}").unwrap();
        assert_eq!(config.prefixes, default_prefixes());
        assert!(config.layouts.is_empty());
    }

    #[test]
    fn test_config_parse_layouts() {
        let yaml = r#"
prefixes:
  - app.views.
layouts:
  - id: "0x7f030001"
    path: layouts/main.xml
"#;
        let config = InflaterConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.prefixes, vec!["app.views.".to_string()]);
        assert_eq!(config.layouts.len(), 1);
        assert_eq!(config.layouts[0].id, "0x7f030001");
    }

    #[test]
    fn test_config_rejects_bad_prefix() {
        let yaml = "prefixes:\n  - not-a-prefix\n";
        let err = InflaterConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, InflaterError::InvalidTypeName(_)));
    }

    #[test]
    fn test_config_load_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inflater.yaml");
        fs::write(&path, "layouts:\n  - id: \"7\"\n    path: main.xml\n").unwrap();

        let config = InflaterConfig::load(&path).unwrap();
        let paths = config.layout_paths();
        assert_eq!(paths.get("7"), Some(&dir.path().join("main.xml")));
    }
}
