//! Configuration for the rendering pipeline and its host.
//!
//! Every section has a `Default` matching the built-in behavior, so a missing
//! config file or a partial one is always valid:
//!
//! ```toml
//! [render]
//! sanitize = true
//!
//! [sanitizer]
//! blocked_tags = ["script", "iframe", "object", "embed", "form", "style"]
//!
//! [front_matter]
//! block_scan_lines = 30
//! ```
//!
//! # Resolution
//!
//! [`MarkwardConfig::load`] checks, in order: the explicit path, the
//! `MARKWARD_CONFIG` environment variable, then
//! `<config_dir>/markward/config.toml`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "MARKWARD_CONFIG";

/// Tags removed by the sanitizer unless configured otherwise.
pub const DEFAULT_BLOCKED_TAGS: [&str; 5] = ["script", "iframe", "object", "embed", "form"];

/// Lines scanned for a closing front-matter delimiter.
pub const DEFAULT_BLOCK_SCAN_LINES: usize = 30;

/// Lines scanned for a `# heading` title when front matter has none.
pub const DEFAULT_HEADING_SCAN_LINES: usize = 10;

// ============================================================================
// Sections
// ============================================================================

/// Per-document defaults applied when the host does not override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    /// Strip a uniform leading indentation before conversion.
    pub normalize_whitespace: bool,
    /// Scrub converter output of scriptable markup.
    pub sanitize: bool,
    /// Emit `pragma-line-N` ids for editor preview synchronization.
    pub use_pragma_lines: bool,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            sanitize: true,
            use_pragma_lines: false,
        }
    }
}

/// Sanitizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Elements removed together with their content.
    pub blocked_tags: BTreeSet<String>,
}

impl SanitizerConfig {
    /// The built-in blocked tag set.
    pub fn default_blocked_tags() -> BTreeSet<String> {
        DEFAULT_BLOCKED_TAGS.iter().map(|t| t.to_string()).collect()
    }

    /// Returns `true` if the configured set equals the built-in one.
    pub fn uses_default_tags(&self) -> bool {
        self.blocked_tags == Self::default_blocked_tags()
    }
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            blocked_tags: Self::default_blocked_tags(),
        }
    }
}

/// Scan windows for front matter and title detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatterLimits {
    /// Lines searched for the closing `---` delimiter.
    pub block_scan_lines: usize,
    /// Lines searched for a `# heading` title fallback.
    pub heading_scan_lines: usize,
}

impl Default for FrontMatterLimits {
    fn default() -> Self {
        Self {
            block_scan_lines: DEFAULT_BLOCK_SCAN_LINES,
            heading_scan_lines: DEFAULT_HEADING_SCAN_LINES,
        }
    }
}

/// Markdown converter extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Pipe tables
    pub tables: bool,
    /// Footnote references and definitions
    pub footnotes: bool,
    /// `~~strikethrough~~`
    pub strikethrough: bool,
    /// `- [x]` task list items
    pub task_lists: bool,
    /// Curly quotes and dashes
    pub smart_punctuation: bool,
    /// Slug ids on headings
    pub auto_identifiers: bool,
    /// Expand `@icon-name` into Font Awesome markup
    pub font_awesome_icons: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            smart_punctuation: false,
            auto_identifiers: true,
            font_awesome_icons: true,
        }
    }
}

/// Host page settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// HTML template wrapped around rendered documents.
    pub template: Option<PathBuf>,
}

// ============================================================================
// MarkwardConfig
// ============================================================================

/// Complete Markward configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkwardConfig {
    /// Per-document defaults
    pub render: RenderDefaults,
    /// Sanitizer rules
    pub sanitizer: SanitizerConfig,
    /// Front matter scan windows
    pub front_matter: FrontMatterLimits,
    /// Converter extensions
    pub converter: ConverterConfig,
    /// Host page template
    pub page: PageConfig,
}

impl MarkwardConfig {
    /// Project name used for the config directory.
    pub fn project_name() -> &'static str {
        "markward"
    }

    /// Default config file location, if the platform has a config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve the config file path from an explicit path, the environment,
    /// or the platform default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// An explicitly named file that does not exist is an error; a missing
    /// default file is not.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit) else {
            log::debug!("No config directory on this platform, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            if explicit.is_some() {
                return Err(Error::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.front_matter.block_scan_lines == 0 {
            return Err(Error::config("front_matter.block_scan_lines must be positive"));
        }
        if self.front_matter.heading_scan_lines == 0 {
            return Err(Error::config(
                "front_matter.heading_scan_lines must be positive",
            ));
        }
        if let Some(tag) = self.sanitizer.blocked_tags.iter().find(|t| t.trim().is_empty()) {
            return Err(Error::invalid_rule(tag.clone(), "tag name is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    // ------------------------------------------------------------------------
    // Defaults
    // ------------------------------------------------------------------------

    #[test]
    fn test_default_config() {
        let config = MarkwardConfig::default();
        assert!(config.render.normalize_whitespace);
        assert!(config.render.sanitize);
        assert!(!config.render.use_pragma_lines);
        assert!(config.sanitizer.uses_default_tags());
        assert_eq!(config.front_matter.block_scan_lines, 30);
        assert_eq!(config.front_matter.heading_scan_lines, 10);
        assert!(config.page.template.is_none());
    }

    #[test]
    fn test_default_blocked_tags() {
        let tags = SanitizerConfig::default_blocked_tags();
        let expected: Vec<&str> = vec!["embed", "form", "iframe", "object", "script"];
        assert_eq!(tags.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    }

    // ------------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------------

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = MarkwardConfig::from_toml_str("[render]\nsanitize = false\n").unwrap();
        assert!(!config.render.sanitize);
        assert!(config.render.normalize_whitespace);
        assert!(config.sanitizer.uses_default_tags());
    }

    #[test]
    fn test_custom_blocked_tags() {
        let config = MarkwardConfig::from_toml_str(
            "[sanitizer]\nblocked_tags = [\"script\", \"style\"]\n",
        )
        .unwrap();
        assert!(config.sanitizer.blocked_tags.contains("style"));
        assert!(!config.sanitizer.uses_default_tags());
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = MarkwardConfig::from_toml_str("[front_matter]\nblock_scan_lines = 0\n")
            .unwrap_err();
        assert!(err.to_string().contains("block_scan_lines"));
    }

    #[test]
    fn test_empty_tag_rejected() {
        let err =
            MarkwardConfig::from_toml_str("[sanitizer]\nblocked_tags = [\" \"]\n").unwrap_err();
        assert!(matches!(err, Error::InvalidRule { .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = MarkwardConfig::from_toml_str("[render\nsanitize = ").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = MarkwardConfig::default();
        config.converter.smart_punctuation = true;
        config.page.template = Some(PathBuf::from("/srv/page.html"));
        let text = config.to_toml_string().unwrap();
        assert_eq!(MarkwardConfig::from_toml_str(&text).unwrap(), config);
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nuse_pragma_lines = true").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = MarkwardConfig::load(Some(&path)).unwrap();
        assert!(config.render.use_pragma_lines);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = MarkwardConfig::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_resolve_explicit_wins() {
        let path = MarkwardConfig::resolve_config_path(Some("/etc/markward.toml"));
        assert_eq!(path, Some(PathBuf::from("/etc/markward.toml")));
    }
}
