//! Configuration file support
//!
//! Loads settings from ~/.blockhl.toml (or %USERPROFILE%\.blockhl.toml on
//! Windows).
//!
//! Example:
//! ```text
//! # blockhl configuration
//! theme = "light"                  # built-in name or path to a theme file
//! definitions-dir = "~/.blockhl/languages"
//! default-language = "plaintext"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SyntaxError};
use crate::syntax::{LanguageResolver, Theme};

/// Theme used when none is configured or the configured one is unusable
pub const DEFAULT_THEME: &str = "dark";

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Built-in theme name or theme file path
    pub theme: String,
    /// Directory of user language definitions
    pub definitions_dir: Option<PathBuf>,
    /// Language used when a file's extension is not recognized
    pub default_language: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            definitions_dir: None,
            default_language: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".blockhl.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".blockhl.toml"))
        }
    }

    /// Load configuration from the default path.
    ///
    /// A missing file gives the defaults; an unreadable one is logged and
    /// also gives the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "ignoring config: {}", e);
            Self::default()
        })
    }

    /// Load configuration from a file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(contents).map_err(|e| SyntaxError::Config(e.message().to_string()))?;
        if let Some(dir) = config.definitions_dir.take() {
            config.definitions_dir = Some(expand_home(&dir));
        }
        Ok(config)
    }

    /// Definition loader honouring `definitions-dir`
    pub fn resolver(&self) -> LanguageResolver {
        match &self.definitions_dir {
            Some(dir) => LanguageResolver::with_definitions_dir(dir),
            None => LanguageResolver::new(),
        }
    }

    /// The configured theme, or the default one if it cannot be loaded
    pub fn theme(&self) -> Theme {
        Theme::resolve(&self.theme).unwrap_or_else(|e| {
            tracing::warn!(theme = %self.theme, "using default theme: {}", e);
            Theme::builtin(DEFAULT_THEME).unwrap_or_default()
        })
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match Config::config_path().as_deref().and_then(Path::parent) {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
theme = "light"
definitions-dir = "/opt/defs"
default-language = "c"
        "#;

        let config = Config::parse(contents).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.definitions_dir, Some(PathBuf::from("/opt/defs")));
        assert_eq!(config.default_language.as_deref(), Some("c"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.theme().name, DEFAULT_THEME);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            Config::parse("colour = \"red\""),
            Err(SyntaxError::Config(_))
        ));
    }

    #[test]
    fn test_bad_theme_falls_back() {
        let config = Config {
            theme: "/definitely/missing.toml".to_string(),
            ..Default::default()
        };
        assert_eq!(config.theme().name, DEFAULT_THEME);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockhl.toml");
        fs::write(&path, "theme = \"light\"\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().theme, "light");
    }
}
