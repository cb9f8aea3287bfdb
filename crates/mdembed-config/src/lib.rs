//! Configuration management for mdembed.
//!
//! Parses `mdembed.toml` with serde and discovers it in the current
//! directory or its parents.
//!
//! ```toml
//! [links]
//! base_url = "${TRACKER_URL:-https://tracker.example.com}"
//! case_insensitive_ids = false
//!
//! [widgets.release-notes]
//! entity_id = "DOCS-A-12"
//! section_title = "Changelog"
//!
//! [widgets.standup]
//! snippet_workflow = "team-tools"
//! snippet_rule = "standup"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `links.base_url` supports `${VAR}` (error if unset) and
//! `${VAR:-default}`.

mod expand;
mod widget;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use widget::{EmbedSource, WidgetConfig};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdembed.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Entity link configuration.
    pub links: LinksConfig,
    /// Widgets by name.
    pub widgets: BTreeMap<String, WidgetConfig>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Entity link configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Tracker URL prefixed to entity links. Empty for site-relative links.
    pub base_url: String,
    /// Also link lowercase entity IDs.
    pub case_insensitive_ids: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`links.base_url`").
        field: String,
        /// Error message (e.g., "`TRACKER_URL` is not set").
        message: String,
    },
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `mdembed.toml` in the current directory and parents, falling back
    /// to defaults (no widgets, site-relative links).
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Look up a widget by name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no widget has that name.
    pub fn widget(&self, name: &str) -> Result<&WidgetConfig, ConfigError> {
        self.widgets
            .get(name)
            .ok_or_else(|| ConfigError::Validation(format!("unknown widget '{name}'")))
    }

    /// Search for the config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `links.base_url` is not an
    /// http(s) URL without trailing slash, or a widget has no valid source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_links()?;
        for (name, widget) in &self.widgets {
            widget.source().map_err(|e| match e {
                ConfigError::Validation(message) => {
                    ConfigError::Validation(format!("widgets.{name}: {message}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    fn validate_links(&self) -> Result<(), ConfigError> {
        let base_url = &self.links.base_url;
        if base_url.is_empty() {
            return Ok(());
        }
        require_http_url(base_url, "links.base_url")?;
        if base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "links.base_url must not end with '/'".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.links.base_url = expand::expand_env(&self.links.base_url, "links.base_url")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_CONFIG: &str = r#"
[links]
base_url = "https://tracker.example.com"
case_insensitive_ids = true

[widgets.release-notes]
title = "Release notes"
entity_id = "DOCS-A-12"
section_title = "Changelog"
content_field = "Notes"

[widgets.standup]
snippet_workflow = "team-tools"
snippet_rule = "standup"
snippet_param = "backend"
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.links.base_url, "");
        assert!(!config.links.case_insensitive_ids);
        assert!(config.widgets.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(FULL_CONFIG).unwrap();

        assert_eq!(config.links.base_url, "https://tracker.example.com");
        assert!(config.links.case_insensitive_ids);
        assert_eq!(
            config.widgets.keys().collect::<Vec<_>>(),
            vec!["release-notes", "standup"]
        );
        let notes = config.widget("release-notes").unwrap();
        assert_eq!(notes.title.as_deref(), Some("Release notes"));
        assert_eq!(notes.content_field.as_deref(), Some("Notes"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_widget() {
        let config = Config::default();
        let err = config.widget("missing").unwrap_err();

        assert!(err.to_string().contains("unknown widget 'missing'"));
    }

    #[test]
    fn test_unknown_widget_key_is_parse_error() {
        let result = toml::from_str::<Config>("[widgets.x]\nentity = \"DEMO-1\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let config = Config {
            links: LinksConfig {
                base_url: "tracker.example.com".to_owned(),
                ..LinksConfig::default()
            },
            ..Config::default()
        };
        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("links.base_url must start with http"));
    }

    #[test]
    fn test_validate_base_url_trailing_slash() {
        let config = Config {
            links: LinksConfig {
                base_url: "https://tracker.example.com/".to_owned(),
                ..LinksConfig::default()
            },
            ..Config::default()
        };
        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("must not end with '/'"));
    }

    #[test]
    fn test_validate_reports_widget_name() {
        let config: Config = toml::from_str("[widgets.broken]\nentity_id = \"nope\"\n").unwrap();
        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("widgets.broken: entity_id"));
    }

    #[test]
    fn test_expand_env_vars_base_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDEMBED_TEST_TRACKER", "https://yt.example.com");
        }

        let mut config: Config =
            toml::from_str("[links]\nbase_url = \"${MDEMBED_TEST_TRACKER}\"\n").unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.links.base_url, "https://yt.example.com");

        unsafe {
            std::env::remove_var("MDEMBED_TEST_TRACKER");
        }
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, FULL_CONFIG).unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.widgets.len(), 2);
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[links\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_runs_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[widgets.empty]\ntitle = \"Nothing\"\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config(&nested).unwrap();

        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("project");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config(&nested).unwrap();

        assert_eq!(found, nested.join(CONFIG_FILENAME));
    }
}
