//! Themes and the style map derived from them
//!
//! A theme file gives a color and attributes per category:
//!
//! ```toml
//! name = "dark"
//!
//! [keyword]
//! color = "#c678dd"
//! bold = true
//!
//! [comment]
//! color = "gray"
//! italic = true
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::builtin;
use super::style::{Color, Style, StyleMap};
use super::tokens::Category;
use crate::error::{Result, SyntaxError};

/// Style entry for one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeEntry {
    pub color: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
}

impl ThemeEntry {
    /// Entry with only a color
    pub fn color(color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Default::default()
        }
    }
}

/// A color theme as read from a theme source
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,
    pub keyword: Option<ThemeEntry>,
    #[serde(alias = "type")]
    pub function: Option<ThemeEntry>,
    pub comment: Option<ThemeEntry>,
    pub other: Option<ThemeEntry>,
}

impl Theme {
    /// Parse a theme from TOML
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| SyntaxError::ThemeMalformed(e.message().to_string()))
    }

    /// Load a theme file
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        let mut theme = Self::from_toml(&source)?;
        if theme.name.is_empty() {
            theme.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(theme)
    }

    /// Get a built-in theme by name
    pub fn builtin(name: &str) -> Option<Self> {
        let source = builtin::theme_source(name)?;
        match Self::from_toml(source) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::error!(theme = name, "built-in theme is broken: {}", e);
                None
            }
        }
    }

    /// Resolve a built-in theme name or a path to a theme file
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if let Some(theme) = Self::builtin(name_or_path) {
            return Ok(theme);
        }
        Self::load(Path::new(name_or_path))
    }

    /// Entry for a category, if the theme declares one
    pub fn entry(&self, category: Category) -> Option<&ThemeEntry> {
        match category {
            Category::Keyword => self.keyword.as_ref(),
            Category::Function => self.function.as_ref(),
            Category::Comment => self.comment.as_ref(),
            Category::Other => self.other.as_ref(),
        }
    }
}

/// Derive the style of every category from a theme.
///
/// Never fails: a missing entry or an unreadable color falls back to the
/// neutral default style, with a warning.
pub fn build_style_map(theme: &Theme) -> StyleMap {
    StyleMap::from_fn(|category| {
        let Some(entry) = theme.entry(category) else {
            tracing::warn!(
                theme = %theme.name,
                category = category.name(),
                "theme has no entry, using neutral style"
            );
            return Style::default();
        };

        let fg = match entry.color.as_deref() {
            None => Color::Default,
            Some(spec) => Color::parse(spec).unwrap_or_else(|| {
                tracing::warn!(
                    theme = %theme.name,
                    category = category.name(),
                    "unrecognized color '{}', using default",
                    spec
                );
                Color::Default
            }),
        };

        Style {
            fg,
            bold: entry.bold.unwrap_or(false),
            italic: entry.italic.unwrap_or(false),
        }
    })
}
