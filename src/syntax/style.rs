//! Style types for highlighted text
//!
//! Colors and text attributes, the spans the engine emits, and the
//! category-to-style map a theme is turned into.

use super::tokens::Category;

/// Foreground colors: the ANSI 16-color palette plus true color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a color from a theme file.
    ///
    /// Accepts `#rrggbb`, `#rgb` and palette names such as `red` or
    /// `bright-blue` (case-insensitive, `-`, `_` and spaces ignored).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let name: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        let color = match name.as_str() {
            "default" | "none" => Color::Default,
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "brightblack" | "gray" | "grey" => Color::BrightBlack,
            "brightred" => Color::BrightRed,
            "brightgreen" => Color::BrightGreen,
            "brightyellow" => Color::BrightYellow,
            "brightblue" => Color::BrightBlue,
            "brightmagenta" => Color::BrightMagenta,
            "brightcyan" => Color::BrightCyan,
            "brightwhite" => Color::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            // #abc is shorthand for #aabbcc
            let mut channels = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            let r = channels.next()??;
            let g = channels.next()??;
            let b = channels.next()??;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Builder: set foreground color
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A categorized span of text within a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    /// Byte offset where this span starts
    pub start: usize,
    /// Length in bytes
    pub length: usize,
    /// Category of the covered text
    pub category: Category,
}

impl StyledSpan {
    /// Create a new span
    pub fn new(start: usize, length: usize, category: Category) -> Self {
        Self {
            start,
            length,
            category,
        }
    }

    /// Create a span from a byte range
    pub fn from_range(start: usize, end: usize, category: Category) -> Self {
        Self::new(start, end.saturating_sub(start), category)
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Check if span is empty
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Style per category, derived from a theme.
///
/// A map is always complete: every category has a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleMap {
    styles: [Style; 4],
}

impl StyleMap {
    /// Build a map from a style lookup
    pub fn from_fn(mut f: impl FnMut(Category) -> Style) -> Self {
        Self {
            styles: Category::ALL.map(&mut f),
        }
    }

    /// Style for a category
    pub fn get(&self, category: Category) -> Style {
        self.styles[category.index()]
    }
}

impl Default for StyleMap {
    fn default() -> Self {
        Self::from_fn(|category| category.default_style())
    }
}
