//! Highlight categories
//!
//! This module defines the lexical classes a rule can assign to text
//! and the neutral style each one falls back to when a theme is silent.

use super::style::{Color, Style};

/// Lexical category of a span of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Language keywords (if, else, fn, let, etc.)
    Keyword,
    /// Type and function names
    Function,
    /// Line and block comments
    Comment,
    /// Everything else (plain text)
    Other,
}

impl Category {
    /// All categories, in style map order
    pub const ALL: [Category; 4] = [
        Category::Keyword,
        Category::Function,
        Category::Comment,
        Category::Other,
    ];

    /// Position of this category in [`Category::ALL`]
    pub fn index(self) -> usize {
        match self {
            Category::Keyword => 0,
            Category::Function => 1,
            Category::Comment => 2,
            Category::Other => 3,
        }
    }

    /// Style used when no theme supplies one
    pub fn default_style(&self) -> Style {
        match self {
            Category::Keyword => Style::fg(Color::Magenta).with_bold(),
            Category::Function => Style::fg(Color::Blue),
            Category::Comment => Style::fg(Color::BrightBlack).with_italic(),
            Category::Other => Style::default(),
        }
    }

    /// Lower-case name, as written in definition and theme files
    pub fn name(&self) -> &'static str {
        match self {
            Category::Keyword => "keyword",
            Category::Function => "function",
            Category::Comment => "comment",
            Category::Other => "other",
        }
    }

    /// Parse a category tag from a definition file.
    ///
    /// `type` is an alias for `function`. Unknown tags map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "keyword" | "keywords" => Category::Keyword,
            "function" | "functions" | "type" | "types" => Category::Function,
            "comment" | "comments" => Category::Comment,
            _ => Category::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_styles() {
        assert!(!Category::Keyword.default_style().is_default());
        assert!(!Category::Comment.default_style().is_default());
        assert!(Category::Other.default_style().is_default());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Category::from_name("keyword"), Category::Keyword);
        assert_eq!(Category::from_name("Type"), Category::Function);
        assert_eq!(Category::from_name("function"), Category::Function);
        assert_eq!(Category::from_name("COMMENT"), Category::Comment);
        assert_eq!(Category::from_name("string"), Category::Other);
        assert_eq!(Category::from_name(""), Category::Other);
    }

    #[test]
    fn test_index_matches_all() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
            assert_eq!(Category::from_name(category.name()), *category);
        }
    }
}
