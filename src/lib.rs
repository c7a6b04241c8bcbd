//! blockhl - incremental syntax highlighting for block-structured text
//!
//! A document is a sequence of blocks (lines). The engine classifies
//! spans of each block as keyword, function/type, comment or plain text
//! using a swappable language definition, and carries multi-line regions
//! such as block comments from one block to the next. After an edit only
//! the changed block is recomputed, plus following blocks for as long as
//! the state at their end keeps changing.
//!
//! ```
//! use blockhl::{Category, Document, Highlighter};
//!
//! let mut doc = Document::from_text("/* a\nb */ c");
//! let mut highlighter = Highlighter::default();
//! highlighter.set_language(&mut doc, "c").unwrap();
//! assert_eq!(doc.spans(1)[0].category, Category::Comment);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod syntax;

pub use document::{Block, BlockStore, Document};
pub use error::{Result, SyntaxError};
pub use syntax::{
    resolve, BlockState, Cascade, Category, Color, Highlighter, LanguageDefinition,
    LanguageResolver, Style, StyleMap, StyledSpan, Theme, PLAIN_TEXT,
};
