//! Language definitions for syntax highlighting
//!
//! This module provides the LanguageDefinition struct, an ordered list
//! of rules, and the per-block matching algorithm that runs over it.

use super::rules::{BlockState, Region, Rule};
use super::style::StyledSpan;
use super::tokens::Category;

/// Identifier of the rule-less fallback definition
pub const PLAIN_TEXT: &str = "plaintext";

/// Result of highlighting a single block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHighlight {
    /// Contiguous spans covering the whole block
    pub spans: Vec<StyledSpan>,
    /// State at end of block (entry state of the next one)
    pub exit: BlockState,
}

/// A complete language definition for syntax highlighting
#[derive(Debug)]
pub struct LanguageDefinition {
    /// Language identifier (e.g., "c", "python")
    pub name: String,
    /// Rules in priority order: earlier rules win ties
    rules: Vec<Rule>,
}

impl LanguageDefinition {
    /// Create a new empty language definition
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rules: Vec::new(),
        }
    }

    /// The fallback definition: no rules, everything is plain
    pub fn plain_text() -> Self {
        Self::new(PLAIN_TEXT)
    }

    /// Append a rule at the lowest priority
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether this definition highlights nothing
    pub fn is_plain(&self) -> bool {
        self.rules.is_empty()
    }

    /// ID to give the next region rule added
    pub fn next_region_id(&self) -> u32 {
        self.rules.iter().filter_map(Rule::as_region).count() as u32 + 1
    }

    /// Get the region rule owning a block state ID
    fn region_rule(&self, id: u32) -> Option<(&Rule, &Region)> {
        self.rules
            .iter()
            .find_map(|rule| rule.as_region().filter(|r| r.id == id).map(|r| (rule, r)))
    }

    /// Highlight a single block of text.
    ///
    /// Takes the block text and the exit state of the previous block.
    /// Returns spans covering the block and the state for the next one.
    pub fn highlight_block(&self, text: &str, entry: BlockState) -> BlockHighlight {
        let mut spans = Vec::new();
        let mut pos = 0;
        let mut exit = BlockState::NORMAL;

        // Finish a region left open by the previous block. An ID this
        // definition does not know (after a language switch) counts as normal.
        if let Some((rule, region)) = entry.region().and_then(|id| self.region_rule(id)) {
            match region.find_end(text, 0) {
                Some(end) => {
                    spans.push(StyledSpan::from_range(0, end, rule.category));
                    pos = end;
                }
                None => {
                    if !text.is_empty() {
                        spans.push(StyledSpan::from_range(0, text.len(), rule.category));
                    }
                    return BlockHighlight { spans, exit: entry };
                }
            }
        }

        while pos < text.len() {
            let Some((start, len, rule)) = self.earliest_match(text, pos) else {
                break;
            };

            if start > pos {
                spans.push(StyledSpan::from_range(pos, start, Category::Other));
            }

            let matched_end = start + len;
            match rule.as_region() {
                None => {
                    spans.push(StyledSpan::from_range(start, matched_end, rule.category));
                    pos = matched_end;
                }
                Some(region) => match region.find_end(text, matched_end) {
                    Some(close) => {
                        // Region opens and closes within this block
                        spans.push(StyledSpan::from_range(start, close, rule.category));
                        pos = close;
                    }
                    None => {
                        spans.push(StyledSpan::from_range(start, text.len(), rule.category));
                        exit = BlockState::inside(region.id);
                        pos = text.len();
                    }
                },
            }
        }

        if pos < text.len() {
            spans.push(StyledSpan::from_range(pos, text.len(), Category::Other));
        }

        BlockHighlight { spans, exit }
    }

    /// Earliest-starting match at or after `pos`; ties go to the rule
    /// listed first.
    fn earliest_match(&self, text: &str, pos: usize) -> Option<(usize, usize, &Rule)> {
        let mut best: Option<(usize, usize, &Rule)> = None;
        for rule in &self.rules {
            if let Some((start, len)) = rule.find_first_match(text, pos) {
                if best.map_or(true, |(best_start, _, _)| start < best_start) {
                    best = Some((start, len, rule));
                }
                if start == pos {
                    // Nothing later in the list can start earlier
                    break;
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::{LiteralPattern, RegexPattern};

    fn regex(pattern: &str) -> RegexPattern {
        RegexPattern::new(pattern, false).unwrap()
    }

    fn literal(s: &str) -> LiteralPattern {
        LiteralPattern::new(s).unwrap()
    }

    fn create_test_language() -> LanguageDefinition {
        let mut lang = LanguageDefinition::new("test");
        lang.add_rule(Rule::single("line_comment", Category::Comment, regex(r"//.*$")));
        lang.add_rule(Rule::region(
            "block_comment",
            Category::Comment,
            literal("/*"),
            literal("*/"),
            None,
            lang.next_region_id(),
        ));
        lang.add_rule(Rule::single("keyword", Category::Keyword, regex(r"\b(int|return)\b")));
        lang.add_rule(Rule::single("type", Category::Function, regex(r"\b[A-Z][A-Za-z0-9_]*\b")));
        lang
    }

    fn categories(result: &BlockHighlight, text: &str) -> Vec<(String, Category)> {
        result
            .spans
            .iter()
            .map(|s| (text[s.start..s.end()].to_string(), s.category))
            .collect()
    }

    #[test]
    fn test_simple_highlighting() {
        let lang = create_test_language();
        let text = "int x = Foo(1);";
        let result = lang.highlight_block(text, BlockState::NORMAL);

        assert!(result.exit.is_normal());
        assert_eq!(
            categories(&result, text),
            vec![
                ("int".to_string(), Category::Keyword),
                (" x = ".to_string(), Category::Other),
                ("Foo".to_string(), Category::Function),
                ("(1);".to_string(), Category::Other),
            ]
        );
    }

    #[test]
    fn test_no_matches_is_one_plain_span() {
        let lang = create_test_language();
        let result = lang.highlight_block("x = y;", BlockState::NORMAL);
        assert_eq!(result.spans, vec![StyledSpan::new(0, 6, Category::Other)]);
        assert!(result.exit.is_normal());
    }

    #[test]
    fn test_empty_block() {
        let lang = create_test_language();
        let result = lang.highlight_block("", BlockState::NORMAL);
        assert!(result.spans.is_empty());
        assert!(result.exit.is_normal());

        let open = BlockState::inside(1);
        let result = lang.highlight_block("", open);
        assert!(result.spans.is_empty());
        assert_eq!(result.exit, open);
    }

    #[test]
    fn test_line_comment() {
        let lang = create_test_language();
        let text = "x // int";
        let result = lang.highlight_block(text, BlockState::NORMAL);
        assert_eq!(
            categories(&result, text),
            vec![
                ("x ".to_string(), Category::Other),
                ("// int".to_string(), Category::Comment),
            ]
        );
    }

    #[test]
    fn test_region_start() {
        let lang = create_test_language();
        let result = lang.highlight_block("code /* comment", BlockState::NORMAL);
        assert_eq!(result.exit, BlockState::inside(1));
        assert_eq!(result.spans.last(), Some(&StyledSpan::new(5, 10, Category::Comment)));
    }

    #[test]
    fn test_region_closed_in_block() {
        let lang = create_test_language();
        let text = "a /* b */ int";
        let result = lang.highlight_block(text, BlockState::NORMAL);
        assert!(result.exit.is_normal());
        assert_eq!(
            categories(&result, text),
            vec![
                ("a ".to_string(), Category::Other),
                ("/* b */".to_string(), Category::Comment),
                (" ".to_string(), Category::Other),
                ("int".to_string(), Category::Keyword),
            ]
        );
    }

    #[test]
    fn test_region_continue() {
        let lang = create_test_language();
        let state = BlockState::inside(1);
        let result = lang.highlight_block("still int comment", state);
        assert_eq!(result.exit, state);
        assert_eq!(result.spans, vec![StyledSpan::new(0, 17, Category::Comment)]);
    }

    #[test]
    fn test_region_end() {
        let lang = create_test_language();
        let text = "b */ c";
        let result = lang.highlight_block(text, BlockState::inside(1));
        assert!(result.exit.is_normal());
        assert_eq!(
            categories(&result, text),
            vec![
                ("b */".to_string(), Category::Comment),
                (" c".to_string(), Category::Other),
            ]
        );
    }

    #[test]
    fn test_region_reopened_after_close() {
        let lang = create_test_language();
        let result = lang.highlight_block("*/ x /* y", BlockState::inside(1));
        assert_eq!(result.exit, BlockState::inside(1));
    }

    #[test]
    fn test_unknown_entry_state_is_normal() {
        let lang = create_test_language();
        let result = lang.highlight_block("int", BlockState::inside(42));
        assert!(result.exit.is_normal());
        assert_eq!(result.spans, vec![StyledSpan::new(0, 3, Category::Keyword)]);
    }

    #[test]
    fn test_earlier_rule_wins_tie() {
        // Both rules match "return" at offset 0
        let mut lang = LanguageDefinition::new("tie");
        lang.add_rule(Rule::single("kw", Category::Keyword, literal("return")));
        lang.add_rule(Rule::single("word", Category::Function, regex(r"\w+")));
        let result = lang.highlight_block("return", BlockState::NORMAL);
        assert_eq!(result.spans, vec![StyledSpan::new(0, 6, Category::Keyword)]);

        let mut lang = LanguageDefinition::new("tie");
        lang.add_rule(Rule::single("word", Category::Function, regex(r"\w+")));
        lang.add_rule(Rule::single("kw", Category::Keyword, literal("return")));
        let result = lang.highlight_block("return", BlockState::NORMAL);
        assert_eq!(result.spans, vec![StyledSpan::new(0, 6, Category::Function)]);
    }

    #[test]
    fn test_earliest_start_beats_priority() {
        let mut lang = LanguageDefinition::new("order");
        lang.add_rule(Rule::single("late", Category::Keyword, literal("b")));
        lang.add_rule(Rule::single("early", Category::Comment, literal("a")));
        let text = "ab";
        let result = lang.highlight_block(text, BlockState::NORMAL);
        assert_eq!(
            categories(&result, text),
            vec![
                ("a".to_string(), Category::Comment),
                ("b".to_string(), Category::Keyword),
            ]
        );
    }

    #[test]
    fn test_plain_text_definition() {
        let lang = LanguageDefinition::plain_text();
        assert!(lang.is_plain());
        assert_eq!(lang.name, PLAIN_TEXT);
        let result = lang.highlight_block("/* anything", BlockState::NORMAL);
        assert_eq!(result.spans, vec![StyledSpan::new(0, 11, Category::Other)]);
        assert!(result.exit.is_normal());
    }
}
