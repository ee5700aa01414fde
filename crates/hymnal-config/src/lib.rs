//! Configuration management for Hymnal.
//!
//! Parses `hymnal.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! The one value consumers need is the content source location: the
//! spreadsheet or JSON document the site tree is loaded from. It can be
//! set in the config file, expanded from the environment, or overridden
//! wholesale with the `HYMNAL_CONTENT` environment variable.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `content.source`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "hymnal.toml";

/// Environment variable overriding the resolved content source path.
const CONTENT_ENV_VAR: &str = "HYMNAL_CONTENT";

/// Default content source, relative to the config directory.
const DEFAULT_CONTENT_SOURCE: &str = "content/site.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ContentConfig {
    /// Spreadsheet or JSON document the site tree is loaded from.
    pub source: PathBuf,
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
        /// Config field path (e.g., "`content.source`").
        field: String,
        /// Error message (e.g., "${`CONTENT_PATH`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `hymnal.toml` in the current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// The `HYMNAL_CONTENT` environment variable, when set and non-empty,
    /// overrides the resolved content source regardless of where the
    /// config came from.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist or
    /// parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        config.apply_content_override(std::env::var(CONTENT_ENV_VAR).ok());

        Ok(config)
    }

    /// Apply the `HYMNAL_CONTENT` override to the resolved source.
    ///
    /// Empty and unset values leave the configured source in place.
    fn apply_content_override(&mut self, source: Option<String>) {
        if let Some(source) = source
            && !source.is_empty()
        {
            self.content_resolved.source = PathBuf::from(source);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            content: ContentConfigRaw::default(),
            content_resolved: ContentConfig {
                source: base.join(DEFAULT_CONTENT_SOURCE),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref source) = self.content.source {
            self.content.source = Some(expand::expand_env(source, "content.source")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Validates that `content.source`, when present, is not empty.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        if self.content.source.as_deref() == Some("") {
            return Err(ConfigError::Validation(
                "content.source cannot be empty".to_owned(),
            ));
        }
        self.content_resolved = ContentConfig {
            source: config_dir.join(
                self.content
                    .source
                    .as_deref()
                    .unwrap_or(DEFAULT_CONTENT_SOURCE),
            ),
        };
        Ok(())
    }
}
