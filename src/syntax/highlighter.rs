//! The block highlighter
//!
//! This module provides the Highlighter that ties together language
//! selection, theming and incremental re-highlighting of a document.
//! All work is synchronous: each call runs to completion before
//! returning.

use std::ops::Range;
use std::rc::Rc;

use super::language::{LanguageDefinition, PLAIN_TEXT};
use super::resolver::LanguageResolver;
use super::rules::BlockState;
use super::style::{Style, StyleMap};
use super::theme::{build_style_map, Theme};
use super::tokens::Category;
use crate::document::BlockStore;
use crate::error::{Result, SyntaxError};

/// Blocks recomputed by one highlight pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cascade {
    /// First block recomputed
    pub first: usize,
    /// Number of consecutive blocks recomputed
    pub recomputed: usize,
}

impl Cascade {
    /// Recomputed block indices
    pub fn range(&self) -> Range<usize> {
        self.first..self.first + self.recomputed
    }
}

/// Incremental, definition-driven highlighter
#[derive(Debug)]
pub struct Highlighter {
    /// Source of language definitions
    resolver: LanguageResolver,
    /// Active definition
    language: Rc<LanguageDefinition>,
    /// ID the active definition was loaded under
    language_id: String,
    /// Active style per category
    styles: StyleMap,
}

impl Highlighter {
    /// Create a highlighter using the plain-text definition
    pub fn new(resolver: LanguageResolver) -> Self {
        Self {
            resolver,
            language: Rc::new(LanguageDefinition::plain_text()),
            language_id: PLAIN_TEXT.to_string(),
            styles: StyleMap::default(),
        }
    }

    /// The active language definition
    pub fn language(&self) -> &LanguageDefinition {
        &self.language
    }

    /// Name declared by the active definition
    pub fn language_name(&self) -> &str {
        &self.language.name
    }

    /// ID the active definition was loaded under
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// The active style map
    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    /// Style currently used for a category
    pub fn style_for(&self, category: Category) -> Style {
        self.styles.get(category)
    }

    /// The definition loader
    pub fn resolver(&self) -> &LanguageResolver {
        &self.resolver
    }

    /// Switch language and re-highlight the whole document.
    ///
    /// An unknown ID activates the plain-text definition. A definition
    /// that exists but cannot be loaded leaves the active one in place.
    /// Either way the load error is returned.
    pub fn set_language<S: BlockStore>(&mut self, store: &mut S, id: &str) -> Result<()> {
        match self.resolver.load(id) {
            Ok(definition) => {
                self.activate(definition, id);
                self.highlight_all(store);
                Ok(())
            }
            Err(e @ SyntaxError::DefinitionNotFound(_)) => {
                tracing::warn!(language = id, "falling back to plain text: {}", e);
                self.activate(Rc::new(LanguageDefinition::plain_text()), PLAIN_TEXT);
                self.highlight_all(store);
                Err(e)
            }
            Err(e) => {
                tracing::warn!(language = id, active = %self.language_id, "keeping active definition: {}", e);
                Err(e)
            }
        }
    }

    /// Pick the language from a file name and switch to it
    pub fn detect_language<S: BlockStore>(&mut self, store: &mut S, file_name: &str) -> Result<()> {
        let id = self.resolver.resolve(file_name);
        tracing::debug!(file = file_name, language = %id, "detected language");
        self.set_language(store, &id)
    }

    /// Re-read the active definition from its source.
    ///
    /// On failure the definition in use stays active.
    pub fn reload_language<S: BlockStore>(&mut self, store: &mut S) -> Result<()> {
        let id = self.language_id.clone();
        if id == PLAIN_TEXT {
            return Ok(());
        }
        self.resolver.invalidate(&id);
        match self.resolver.load(&id) {
            Ok(definition) => {
                self.language = definition;
                self.highlight_all(store);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(language = %id, "keeping previous definition: {}", e);
                Err(e)
            }
        }
    }

    /// Replace the style map from a theme and repaint every block.
    ///
    /// Only formatting changes, so block states are left alone.
    pub fn update_color<S: BlockStore>(&mut self, store: &mut S, theme: &Theme) -> Cascade {
        self.styles = build_style_map(theme);
        tracing::debug!(theme = %theme.name, "applied theme");
        let count = store.block_count();
        self.repaint(store, 0..count)
    }

    /// Recompute the spans of a range of blocks without cascading.
    ///
    /// Uses the stored entry states; exit states are not touched.
    pub fn repaint<S: BlockStore>(&self, store: &mut S, range: Range<usize>) -> Cascade {
        let end = range.end.min(store.block_count());
        let start = range.start.min(end);
        for index in start..end {
            let entry = store.entry_state(index);
            let result = self.language.highlight_block(store.block_text(index), entry);
            store.emit_spans(index, result.spans);
        }
        Cascade {
            first: start,
            recomputed: end - start,
        }
    }

    /// Highlight every block from the top
    pub fn highlight_all<S: BlockStore>(&self, store: &mut S) -> Cascade {
        let count = store.block_count();
        for index in 0..count {
            self.highlight_one(store, index);
        }
        Cascade {
            first: 0,
            recomputed: count,
        }
    }

    /// A block's text changed: store it, recompute the block and cascade
    pub fn on_block_changed<S: BlockStore>(&self, store: &mut S, index: usize, new_text: &str) -> Cascade {
        if index >= store.block_count() {
            tracing::debug!(index, "change notification for missing block ignored");
            return Cascade {
                first: index,
                recomputed: 0,
            };
        }
        store.set_block_text(index, new_text);
        self.cascade_from(store, index)
    }

    /// Blocks starting at `index` were inserted by the host.
    ///
    /// New blocks have no stored exit state, so the cascade always runs
    /// through all of them.
    pub fn on_blocks_inserted<S: BlockStore>(&self, store: &mut S, index: usize) -> Cascade {
        self.cascade_from(store, index)
    }

    /// The block at `index` was removed by the host
    pub fn on_block_removed<S: BlockStore>(&self, store: &mut S, index: usize) -> Cascade {
        self.cascade_from(store, index)
    }

    /// Recompute blocks from `first` until a block's exit state matches
    /// its previous value or the document ends.
    pub fn cascade_from<S: BlockStore>(&self, store: &mut S, first: usize) -> Cascade {
        let count = store.block_count();
        let mut index = first;
        while index < count {
            let previous = store.exit_state(index);
            let exit = self.highlight_one(store, index);
            index += 1;
            if previous == Some(exit) {
                break;
            }
        }
        let recomputed = index.saturating_sub(first);
        if recomputed > 1 {
            tracing::trace!(first, recomputed, "state change cascaded");
        }
        Cascade { first, recomputed }
    }

    fn activate(&mut self, definition: Rc<LanguageDefinition>, id: &str) {
        self.language = definition;
        self.language_id = id.trim().to_lowercase();
    }

    /// Highlight one block from its entry state and store the results
    fn highlight_one<S: BlockStore>(&self, store: &mut S, index: usize) -> BlockState {
        let entry = store.entry_state(index);
        let result = self.language.highlight_block(store.block_text(index), entry);
        store.set_exit_state(index, result.exit);
        store.emit_spans(index, result.spans);
        result.exit
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(LanguageResolver::new())
    }
}
