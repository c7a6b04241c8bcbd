//! Pattern rules for syntax highlighting
//!
//! This module defines the matching strategies (literal text, regex),
//! the rule types built on them, and the per-block state that carries
//! an open multi-line region from one block to the next.

use std::fmt;

use regex::{Match, Regex, RegexBuilder};

use super::tokens::Category;

/// A matching strategy over a block of text.
///
/// Implementations must never report an empty match.
pub trait Matcher: fmt::Debug {
    /// Find the first match starting at or after byte offset `from`.
    ///
    /// Returns `(start, length)` with `start` absolute within `text`.
    fn find_first_match(&self, text: &str, from: usize) -> Option<(usize, usize)>;
}

/// Plain substring matcher
#[derive(Debug, Clone)]
pub struct LiteralPattern {
    needle: String,
    case_insensitive: bool,
    whole_word: bool,
}

impl LiteralPattern {
    /// Create a literal matcher. Returns None for an empty needle.
    pub fn new(needle: &str) -> Option<Self> {
        if needle.is_empty() {
            return None;
        }
        Some(Self {
            needle: needle.to_string(),
            case_insensitive: false,
            whole_word: false,
        })
    }

    /// Builder: compare ASCII letters without regard to case
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Builder: only match when not surrounded by word characters
    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }

    fn matches_at(&self, text: &str, pos: usize) -> bool {
        let end = pos + self.needle.len();
        let Some(candidate) = text.as_bytes().get(pos..end) else {
            return false;
        };
        let same = if self.case_insensitive {
            candidate.eq_ignore_ascii_case(self.needle.as_bytes())
        } else {
            candidate == self.needle.as_bytes()
        };
        if !same || !text.is_char_boundary(end) {
            return false;
        }
        if self.whole_word {
            let before = text[..pos].chars().next_back();
            let after = text[end..].chars().next();
            if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
                return false;
            }
        }
        true
    }
}

impl Matcher for LiteralPattern {
    fn find_first_match(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        if from >= text.len() || !text.is_char_boundary(from) {
            return None;
        }
        text[from..]
            .char_indices()
            .map(|(i, _)| from + i)
            .find(|&pos| self.matches_at(text, pos))
            .map(|pos| (pos, self.needle.len()))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Name of the capture group that narrows a regex match
pub const TOKEN_GROUP: &str = "token";

/// Regular expression matcher.
///
/// If the pattern has a group named `token`, only that group is reported,
/// so context can be required without being highlighted
/// (`\b(?P<token>\w+)\s*\(` marks a call name but not its parenthesis).
/// The context may lie before the search offset.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    regex: Regex,
    token_group: Option<usize>,
}

impl RegexPattern {
    /// Compile a pattern
    pub fn new(pattern: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()?;
        let token_group = regex
            .capture_names()
            .position(|name| name == Some(TOKEN_GROUP));
        Ok(Self { regex, token_group })
    }

    /// Source text of the pattern
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Earliest non-empty `token` group at or after `from`.
    ///
    /// Every match start is tried, so candidates whose context overlaps
    /// an earlier match are still seen. A token never starts before its
    /// match, so the scan stops once matches start past the best token.
    fn find_token(&self, text: &str, from: usize, group: usize) -> Option<(usize, usize)> {
        let mut best: Option<Match<'_>> = None;
        let mut pos = 0;
        while pos <= text.len() {
            let Some(caps) = self.regex.captures_at(text, pos) else {
                break;
            };
            let whole = caps.get(0)?;
            if best.is_some_and(|b| whole.start() > b.start()) {
                break;
            }
            if let Some(token) = caps.get(group) {
                if token.start() >= from
                    && !token.is_empty()
                    && best.map_or(true, |b| token.start() < b.start())
                {
                    best = Some(token);
                }
            }
            pos = whole.start() + text[whole.start()..].chars().next().map_or(1, char::len_utf8);
        }
        best.map(|m| (m.start(), m.len()))
    }
}

impl Matcher for RegexPattern {
    fn find_first_match(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        if let Some(group) = self.token_group {
            return self.find_token(text, from, group);
        }

        let mut pos = from;
        while pos < text.len() {
            if !text.is_char_boundary(pos) {
                pos += 1;
                continue;
            }
            // find_at keeps the surrounding text visible to ^ and \b
            let m = self.regex.find_at(text, pos)?;
            if !m.is_empty() {
                return Some((m.start(), m.len()));
            }
            // Skip empty matches one character at a time
            pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

/// A multi-line region such as a block comment
#[derive(Debug)]
pub struct Region {
    /// Pattern that opens the region
    pub start: Box<dyn Matcher>,
    /// Pattern that closes the region
    pub end: Box<dyn Matcher>,
    /// Character that escapes the end pattern (usually backslash)
    pub escape: Option<char>,
    /// Unique ID for this region's block state (never 0)
    pub id: u32,
}

impl Region {
    /// Find the start of this region at or after `from`
    pub fn find_start(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        self.start.find_first_match(text, from)
    }

    /// Find the end of this region at or after `from`, respecting escapes.
    ///
    /// Returns the offset just past the end marker.
    pub fn find_end(&self, text: &str, from: usize) -> Option<usize> {
        let mut pos = from;
        loop {
            let (start, len) = self.end.find_first_match(text, pos)?;
            if let Some(escape) = self.escape {
                let escapes = text[from..start]
                    .chars()
                    .rev()
                    .take_while(|&c| c == escape)
                    .count();
                if escapes % 2 == 1 {
                    // Odd number of escapes = escaped
                    pos = start + len;
                    continue;
                }
            }
            return Some(start + len);
        }
    }
}

/// What a rule matches
#[derive(Debug)]
pub enum RuleKind {
    /// Confined to a single block
    Single(Box<dyn Matcher>),
    /// May span several blocks
    Region(Region),
}

/// A single highlighting rule.
///
/// Rules are immutable once loaded. Their position in the language
/// definition is their priority.
#[derive(Debug)]
pub struct Rule {
    /// Name for diagnostics
    pub name: String,
    /// Category assigned to matched text
    pub category: Category,
    /// Matching behaviour
    pub kind: RuleKind,
}

impl Rule {
    /// Create a single-block rule
    pub fn single(name: &str, category: Category, matcher: impl Matcher + 'static) -> Self {
        Self {
            name: name.to_string(),
            category,
            kind: RuleKind::Single(Box::new(matcher)),
        }
    }

    /// Create a multi-line region rule
    pub fn region(
        name: &str,
        category: Category,
        start: impl Matcher + 'static,
        end: impl Matcher + 'static,
        escape: Option<char>,
        id: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            category,
            kind: RuleKind::Region(Region {
                start: Box::new(start),
                end: Box::new(end),
                escape,
                id,
            }),
        }
    }

    /// The region this rule opens, if it is a multi-line rule
    pub fn as_region(&self) -> Option<&Region> {
        match &self.kind {
            RuleKind::Region(region) => Some(region),
            RuleKind::Single(_) => None,
        }
    }

    /// Find where this rule (or its region start) first matches
    pub fn find_first_match(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        match &self.kind {
            RuleKind::Single(matcher) => matcher.find_first_match(text, from),
            RuleKind::Region(region) => region.find_start(text, from),
        }
    }
}

/// Block state for tracking multi-line regions.
///
/// 0 = normal, n > 0 = inside the region with ID n.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockState(u32);

impl BlockState {
    /// Outside any region
    pub const NORMAL: BlockState = BlockState(0);

    /// Create state for being inside a region
    pub fn inside(region_id: u32) -> Self {
        Self(region_id)
    }

    /// Check if we're in normal (no region) state
    pub fn is_normal(&self) -> bool {
        self.0 == 0
    }

    /// ID of the open region, if any
    pub fn region(&self) -> Option<u32> {
        (self.0 != 0).then_some(self.0)
    }

    /// Raw integer encoding
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}
