//! Declarative language definition files
//!
//! Definitions are TOML documents:
//!
//! ```toml
//! name = "c"
//! extensions = ["c", "h"]
//!
//! [[rule]]
//! name = "block_comment"
//! category = "comment"
//! start = '/\*'
//! end = '\*/'
//!
//! [[rule]]
//! category = "keyword"
//! keywords = ["if", "else", "return"]
//!
//! [[rule]]
//! category = "function"
//! pattern = '\b[A-Z]\w*'
//! ```
//!
//! `extensions` lets a user definition claim file extensions for
//! language detection.
//!
//! Each rule has exactly one of `pattern` (regex), `literal`, `keywords`,
//! or `start`/`end` (a multi-line region, with an optional `escape`).
//! Rule order is priority order.

use serde::Deserialize;

use super::language::LanguageDefinition;
use super::rules::{LiteralPattern, RegexPattern, Rule};
use super::tokens::Category;
use crate::error::{Result, SyntaxError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionFile {
    name: Option<String>,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    case_insensitive: bool,
    #[serde(default, rename = "rule")]
    rules: Vec<RuleEntry>,
}

/// Only the detection keys of a definition file
#[derive(Debug, Deserialize)]
struct DefinitionHeader {
    #[serde(default)]
    extensions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    name: Option<String>,
    category: Option<String>,
    pattern: Option<String>,
    literal: Option<String>,
    keywords: Option<Vec<String>>,
    start: Option<String>,
    end: Option<String>,
    escape: Option<String>,
}

/// A parsed definition plus the rules that had to be skipped
#[derive(Debug)]
pub struct LoadedDefinition {
    pub definition: LanguageDefinition,
    /// One `PatternInvalid` per skipped rule
    pub warnings: Vec<SyntaxError>,
}

/// Parse a definition source.
///
/// `id` names the source in errors. Structural problems fail the whole
/// definition with `DefinitionMalformed`; a rule whose expression does not
/// compile is skipped and reported as `PatternInvalid`.
pub fn parse_definition(id: &str, source: &str) -> Result<LoadedDefinition> {
    let file: DefinitionFile =
        toml::from_str(source).map_err(|e| SyntaxError::malformed(id, e.message()))?;

    let name = match file.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(SyntaxError::malformed(id, "missing required field `name`")),
    };

    if file.extensions.iter().any(|ext| normalize_extension(ext).is_empty()) {
        return Err(SyntaxError::malformed(id, "empty entry in `extensions`"));
    }

    let mut definition = LanguageDefinition::new(&name);

    let mut warnings = Vec::new();
    for (index, entry) in file.rules.iter().enumerate() {
        let rule_name = entry
            .name
            .clone()
            .unwrap_or_else(|| format!("rule #{}", index + 1));

        match build_rule(&name, &rule_name, entry, file.case_insensitive, &definition)? {
            Ok(rule) => definition.add_rule(rule),
            Err(reason) => {
                tracing::warn!(language = %name, rule = %rule_name, "skipping rule: {}", reason);
                warnings.push(SyntaxError::PatternInvalid {
                    language: name.clone(),
                    rule: rule_name,
                    reason,
                });
            }
        }
    }

    tracing::debug!(
        language = %name,
        rules = definition.rules().len(),
        skipped = warnings.len(),
        "parsed language definition"
    );

    Ok(LoadedDefinition {
        definition,
        warnings,
    })
}

/// File extensions a definition source claims, lower-case and without
/// a leading dot. Rules are not compiled.
pub fn declared_extensions(id: &str, source: &str) -> Result<Vec<String>> {
    let header: DefinitionHeader =
        toml::from_str(source).map_err(|e| SyntaxError::malformed(id, e.message()))?;
    Ok(header
        .extensions
        .iter()
        .map(|ext| normalize_extension(ext))
        .filter(|ext| !ext.is_empty())
        .collect())
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Build one rule. The outer error is structural; the inner one is a
/// pattern that failed to compile.
fn build_rule(
    language: &str,
    rule_name: &str,
    entry: &RuleEntry,
    case_insensitive: bool,
    definition: &LanguageDefinition,
) -> Result<std::result::Result<Rule, String>> {
    let category = entry
        .category
        .as_deref()
        .map_or(Category::Other, Category::from_name);

    let shapes = [
        entry.pattern.is_some(),
        entry.literal.is_some(),
        entry.keywords.is_some(),
        entry.start.is_some(),
    ]
    .iter()
    .filter(|&&present| present)
    .count();

    if shapes != 1 {
        return Err(SyntaxError::malformed(
            language,
            format!(
                "rule '{}' needs exactly one of `pattern`, `literal`, `keywords` or `start`",
                rule_name
            ),
        ));
    }
    if entry.end.is_some() && entry.start.is_none() {
        return Err(SyntaxError::malformed(
            language,
            format!("rule '{}' has `end` without `start`", rule_name),
        ));
    }
    if entry.escape.is_some() && entry.start.is_none() {
        return Err(SyntaxError::malformed(
            language,
            format!("rule '{}' has `escape` outside a region", rule_name),
        ));
    }

    let compile = |pattern: &str| RegexPattern::new(pattern, case_insensitive).map_err(|e| e.to_string());

    if let Some(pattern) = &entry.pattern {
        return Ok(compile(pattern).map(|m| Rule::single(rule_name, category, m)));
    }

    if let Some(literal) = &entry.literal {
        let matcher = LiteralPattern::new(literal).ok_or_else(|| {
            SyntaxError::malformed(language, format!("rule '{}' has an empty `literal`", rule_name))
        })?;
        return Ok(Ok(Rule::single(
            rule_name,
            category,
            matcher.case_insensitive(case_insensitive),
        )));
    }

    if let Some(keywords) = &entry.keywords {
        let words: Vec<String> = keywords
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(regex::escape)
            .collect();
        if words.is_empty() {
            return Err(SyntaxError::malformed(
                language,
                format!("rule '{}' has an empty `keywords` list", rule_name),
            ));
        }
        let pattern = format!(r"\b(?:{})\b", words.join("|"));
        return Ok(compile(&pattern).map(|m| Rule::single(rule_name, category, m)));
    }

    let (Some(start), Some(end)) = (&entry.start, &entry.end) else {
        return Err(SyntaxError::malformed(
            language,
            format!("rule '{}' has `start` without `end`", rule_name),
        ));
    };

    let escape = match entry.escape.as_deref() {
        None => None,
        Some(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => {
                    return Err(SyntaxError::malformed(
                        language,
                        format!("rule '{}': `escape` must be a single character", rule_name),
                    ))
                }
            }
        }
    };

    let start = match compile(start) {
        Ok(m) => m,
        Err(reason) => return Ok(Err(format!("start: {}", reason))),
    };
    let end = match compile(end) {
        Ok(m) => m,
        Err(reason) => return Ok(Err(format!("end: {}", reason))),
    };

    Ok(Ok(Rule::region(
        rule_name,
        category,
        start,
        end,
        escape,
        definition.next_region_id(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::BlockState;

    const SAMPLE: &str = r#"
name = "sample"
extensions = [".smp", "sam"]

[[rule]]
name = "block_comment"
category = "comment"
start = '/\*'
end = '\*/'

[[rule]]
category = "keyword"
keywords = ["if", "else"]

[[rule]]
name = "arrow"
category = "function"
literal = "->"
"#;

    #[test]
    fn test_parse_sample() {
        let loaded = parse_definition("sample", SAMPLE).unwrap();
        let def = &loaded.definition;
        assert!(loaded.warnings.is_empty());
        assert_eq!(def.name, "sample");
        assert_eq!(def.rules().len(), 3);
        assert_eq!(def.rules()[0].as_region().map(|r| r.id), Some(1));
        assert_eq!(def.rules()[1].name, "rule #2");
        assert_eq!(def.rules()[1].category, Category::Keyword);

        let result = def.highlight_block("if a /* x", BlockState::NORMAL);
        assert_eq!(result.exit, BlockState::inside(1));
    }

    #[test]
    fn test_keywords_are_whole_words() {
        let loaded = parse_definition("sample", SAMPLE).unwrap();
        let result = loaded
            .definition
            .highlight_block("elsewhere", BlockState::NORMAL);
        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].category, Category::Other);
    }

    #[test]
    fn test_declared_extensions() {
        assert_eq!(declared_extensions("sample", SAMPLE).unwrap(), vec!["smp", "sam"]);
        assert_eq!(
            declared_extensions("x", "name = \"x\"\nextensions = [\"FOO\"]").unwrap(),
            vec!["foo"]
        );
        assert!(declared_extensions("x", "name = \"x\"").unwrap().is_empty());
        assert!(declared_extensions("x", "extensions = 3").is_err());
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let source = r##"
name = "broken"

[[rule]]
name = "bad"
category = "keyword"
pattern = "(unclosed"

[[rule]]
name = "good"
category = "comment"
pattern = "#.*"
"##;
        let loaded = parse_definition("broken", source).unwrap();
        assert_eq!(loaded.definition.rules().len(), 1);
        assert_eq!(loaded.definition.rules()[0].name, "good");
        assert_eq!(loaded.warnings.len(), 1);
        assert!(matches!(
            &loaded.warnings[0],
            SyntaxError::PatternInvalid { rule, .. } if rule == "bad"
        ));
    }

    #[test]
    fn test_skipped_region_does_not_consume_id() {
        let source = r#"
name = "ids"

[[rule]]
start = "("
end = "x"

[[rule]]
start = "<"
end = ">"
"#;
        let loaded = parse_definition("ids", source).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.definition.rules()[0].as_region().map(|r| r.id), Some(1));
    }

    #[test]
    fn test_malformed_definitions() {
        let cases = [
            "this is not toml = = =",
            "extensions = [\"x\"]",
            "name = \"x\"\nextensions = [\".\"]",
            "name = \"\"",
            "name = \"x\"\n[[rule]]\ncategory = \"keyword\"",
            "name = \"x\"\n[[rule]]\npattern = \"a\"\nliteral = \"b\"",
            "name = \"x\"\n[[rule]]\nstart = \"a\"",
            "name = \"x\"\n[[rule]]\npattern = \"a\"\nend = \"b\"",
            "name = \"x\"\n[[rule]]\nstart = \"a\"\nend = \"b\"\nescape = \"ab\"",
            "name = \"x\"\n[[rule]]\nkeywords = []",
            "name = \"x\"\n[[rule]]\nliteral = \"\"",
            "name = \"x\"\n[[rule]]\npatern = \"a\"",
        ];
        for source in cases {
            let err = parse_definition("x", source).unwrap_err();
            assert!(
                matches!(err, SyntaxError::DefinitionMalformed { .. }),
                "expected malformed for {:?}, got {:?}",
                source,
                err
            );
        }
    }

    #[test]
    fn test_case_insensitive_definition() {
        let source = r#"
name = "sql"
case_insensitive = true

[[rule]]
category = "keyword"
keywords = ["select"]
"#;
        let loaded = parse_definition("sql", source).unwrap();
        let result = loaded
            .definition
            .highlight_block("SeLeCt 1", BlockState::NORMAL);
        assert_eq!(result.spans[0].category, Category::Keyword);
        assert_eq!(result.spans[0].length, 6);
    }
}
