//! Syntax highlighting engine
//!
//! This module provides everything between a language definition source
//! and the spans handed to a renderer:
//! - Rules and matching strategies
//! - Language definitions and the per-block algorithm
//! - Language resolution by file name
//! - Themes and style maps
//! - The incremental block highlighter

mod builtin;
mod definition;
mod highlighter;
mod language;
mod resolver;
mod rules;
mod style;
mod theme;
mod tokens;

pub use definition::{parse_definition, LoadedDefinition};
pub use highlighter::{Cascade, Highlighter};
pub use language::{BlockHighlight, LanguageDefinition, PLAIN_TEXT};
pub use resolver::{resolve, LanguageResolver};
pub use rules::{BlockState, LiteralPattern, Matcher, Region, RegexPattern, Rule, RuleKind};
pub use style::{Color, Style, StyleMap, StyledSpan};
pub use theme::{build_style_map, Theme, ThemeEntry};
pub use tokens::Category;

/// Names of the bundled themes
pub fn builtin_themes() -> Vec<&'static str> {
    builtin::theme_names().collect()
}
