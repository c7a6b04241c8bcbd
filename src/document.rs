//! Block-structured documents
//!
//! The highlighter never owns text. It talks to the host's storage
//! through [`BlockStore`]; [`Document`] is a plain in-memory store of
//! lines used by the command-line front end and the tests.

use std::path::Path;

use crate::syntax::{BlockState, StyledSpan};

/// Host document interface.
///
/// Block indices are positions, `0..block_count()`. Callers must pass
/// valid indices.
pub trait BlockStore {
    /// Number of blocks
    fn block_count(&self) -> usize;

    /// Text of a block, without its line terminator
    fn block_text(&self, index: usize) -> &str;

    /// Replace the text of a block
    fn set_block_text(&mut self, index: usize, text: &str);

    /// Exit state stored by the last highlight of a block (None if never
    /// highlighted)
    fn exit_state(&self, index: usize) -> Option<BlockState>;

    /// Store the exit state of a block
    fn set_exit_state(&mut self, index: usize, state: BlockState);

    /// Receive the spans computed for a block
    fn emit_spans(&mut self, index: usize, spans: Vec<StyledSpan>);

    /// State at the start of a block: the previous block's exit state
    fn entry_state(&self, index: usize) -> BlockState {
        if index == 0 {
            return BlockState::NORMAL;
        }
        self.exit_state(index - 1).unwrap_or_default()
    }
}

/// A single block of a document
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// The text content (without trailing newline)
    text: String,
    /// Exit state from the last highlight pass
    exit_state: Option<BlockState>,
    /// Spans from the last highlight pass
    spans: Vec<StyledSpan>,
}

impl Block {
    /// Create a block from a string
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Spans from the last highlight pass
    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    /// Exit state from the last highlight pass
    pub fn exit_state(&self) -> Option<BlockState> {
        self.exit_state
    }
}

/// An arena of blocks indexed by position
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Create a document with a single empty block
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::default()], // Always have at least one block
        }
    }

    /// Split text into one block per line
    pub fn from_text(text: &str) -> Self {
        let blocks: Vec<Block> = text.lines().map(Block::new).collect();
        if blocks.is_empty() {
            return Self::new();
        }
        Self { blocks }
    }

    /// Build a document from lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let blocks: Vec<Block> = lines.into_iter().map(Block::new).collect();
        if blocks.is_empty() {
            return Self::new();
        }
        Self { blocks }
    }

    /// Read a file into a document
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&content))
    }

    /// Get number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document holds only one empty block
    pub fn is_empty(&self) -> bool {
        self.blocks.len() == 1 && self.blocks[0].text.is_empty()
    }

    /// Get a block by index
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Iterate over blocks
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Spans of a block (empty if out of range or not highlighted)
    pub fn spans(&self, index: usize) -> &[StyledSpan] {
        self.blocks.get(index).map(Block::spans).unwrap_or_default()
    }

    /// Insert a new block before `index` (`index == len()` appends)
    pub fn insert_block(&mut self, index: usize, text: &str) {
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, Block::new(text));
    }

    /// Remove a block, keeping at least one
    pub fn remove_block(&mut self, index: usize) -> Option<Block> {
        if index >= self.blocks.len() {
            return None;
        }
        let removed = self.blocks.remove(index);
        if self.blocks.is_empty() {
            self.blocks.push(Block::default());
        }
        Some(removed)
    }

    /// Whole document text, blocks joined by newlines
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore for Document {
    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn block_text(&self, index: usize) -> &str {
        &self.blocks[index].text
    }

    fn set_block_text(&mut self, index: usize, text: &str) {
        let block = &mut self.blocks[index];
        block.text.clear();
        block.text.push_str(text);
    }

    fn exit_state(&self, index: usize) -> Option<BlockState> {
        self.blocks[index].exit_state
    }

    fn set_exit_state(&mut self, index: usize, state: BlockState) {
        self.blocks[index].exit_state = Some(state);
    }

    fn emit_spans(&mut self, index: usize, spans: Vec<StyledSpan>) {
        self.blocks[index].spans = spans;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        let doc = Document::from_text("a\nb\n\nc");
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.block_text(1), "b");
        assert_eq!(doc.block_text(2), "");
        assert_eq!(doc.text(), "a\nb\n\nc");
    }

    #[test]
    fn test_empty_document_has_one_block() {
        let doc = Document::from_text("");
        assert_eq!(doc.len(), 1);
        assert!(doc.is_empty());
        assert_eq!(Document::from_lines(Vec::<String>::new()).len(), 1);
    }

    #[test]
    fn test_entry_state_follows_previous_exit() {
        let mut doc = Document::from_lines(["a", "b"]);
        assert_eq!(doc.entry_state(0), BlockState::NORMAL);
        assert_eq!(doc.entry_state(1), BlockState::NORMAL);

        doc.set_exit_state(0, BlockState::inside(2));
        assert_eq!(doc.entry_state(1), BlockState::inside(2));
        assert_eq!(doc.exit_state(1), None);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut doc = Document::from_lines(["a", "c"]);
        doc.insert_block(1, "b");
        doc.insert_block(99, "d");
        assert_eq!(doc.text(), "a\nb\nc\nd");

        assert_eq!(doc.remove_block(0).map(|b| b.text().to_string()), Some("a".to_string()));
        assert!(doc.remove_block(10).is_none());
        assert_eq!(doc.len(), 3);

        let mut single = Document::from_lines(["only"]);
        single.remove_block(0);
        assert_eq!(single.len(), 1);
        assert!(single.is_empty());
    }

    #[test]
    fn test_set_block_text_keeps_state() {
        let mut doc = Document::from_lines(["a"]);
        doc.set_exit_state(0, BlockState::inside(1));
        doc.set_block_text(0, "changed");
        assert_eq!(doc.block_text(0), "changed");
        assert_eq!(doc.exit_state(0), Some(BlockState::inside(1)));
    }
}
