//! Display rendering
//!
//! Paints highlighted blocks on a terminal stream with crossterm.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{self, Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
};

use blockhl::{Color, Document, Style, StyleMap};

/// Convert an engine color to a terminal color
fn to_crossterm(color: Color) -> Option<style::Color> {
    let color = match color {
        Color::Default => return None,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::BrightBlack => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
        Color::Rgb(r, g, b) => style::Color::Rgb { r, g, b },
    };
    Some(color)
}

/// Writes a document's spans using a style map
pub struct Painter<W: Write> {
    out: W,
    /// Emit escape sequences (false = plain text)
    color: bool,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Paint every block, one per line
    pub fn paint(&mut self, doc: &Document, styles: &StyleMap) -> io::Result<()> {
        for block in doc.blocks() {
            let text = block.text();
            let mut pos = 0;
            for span in block.spans() {
                // Spans cover the block; anything else is printed unstyled
                if span.start > pos {
                    queue!(self.out, Print(&text[pos..span.start]))?;
                }
                self.write_styled(&text[span.start..span.end()], styles.get(span.category))?;
                pos = span.end();
            }
            if pos < text.len() {
                queue!(self.out, Print(&text[pos..]))?;
            }
            queue!(self.out, Print("\n"))?;
        }
        self.out.flush()
    }

    fn write_styled(&mut self, text: &str, style: Style) -> io::Result<()> {
        if !self.color || style.is_default() {
            return queue!(self.out, Print(text));
        }
        if let Some(fg) = to_crossterm(style.fg) {
            queue!(self.out, SetForegroundColor(fg))?;
        }
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(self.out, SetAttribute(Attribute::Italic))?;
        }
        queue!(
            self.out,
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
