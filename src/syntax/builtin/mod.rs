//! Built-in language definitions and themes
//!
//! The sources are bundled into the binary and parsed on first use,
//! exactly like definitions loaded from a user directory.

/// Definition sources by language ID
const DEFINITIONS: &[(&str, &str)] = &[
    ("c", include_str!("c.toml")),
    ("cpp", include_str!("cpp.toml")),
    ("rust", include_str!("rust.toml")),
    ("python", include_str!("python.toml")),
    ("javascript", include_str!("javascript.toml")),
    ("shell", include_str!("shell.toml")),
    ("markdown", include_str!("markdown.toml")),
    ("toml", include_str!("toml.toml")),
];

/// Theme sources by name
const THEMES: &[(&str, &str)] = &[
    ("dark", include_str!("theme_dark.toml")),
    ("light", include_str!("theme_light.toml")),
];

/// Source of a built-in language definition
pub fn definition_source(id: &str) -> Option<&'static str> {
    lookup(DEFINITIONS, id)
}

/// IDs of all built-in language definitions
pub fn definition_ids() -> impl Iterator<Item = &'static str> {
    DEFINITIONS.iter().map(|(id, _)| *id)
}

/// Source of a built-in theme
pub fn theme_source(name: &str) -> Option<&'static str> {
    lookup(THEMES, name)
}

/// Names of all built-in themes
pub fn theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|(name, _)| *name)
}

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, source)| *source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::definition::parse_definition;
    use crate::syntax::rules::BlockState;
    use crate::syntax::theme::Theme;
    use crate::syntax::tokens::Category;

    #[test]
    fn test_all_builtin_definitions_parse_cleanly() {
        for id in definition_ids() {
            let source = definition_source(id).unwrap();
            let loaded = parse_definition(id, source)
                .unwrap_or_else(|e| panic!("built-in '{}' failed: {}", id, e));
            assert!(loaded.warnings.is_empty(), "{}: {:?}", id, loaded.warnings);
            assert_eq!(loaded.definition.name, id);
            assert!(!loaded.definition.is_plain());
        }
    }

    #[test]
    fn test_all_builtin_themes_parse() {
        for name in theme_names() {
            let theme = Theme::from_toml(theme_source(name).unwrap()).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    fn spans_of(id: &str, text: &str) -> Vec<(String, Category)> {
        let def = parse_definition(id, definition_source(id).unwrap())
            .unwrap()
            .definition;
        def.highlight_block(text, BlockState::NORMAL)
            .spans
            .iter()
            .filter(|s| s.category != Category::Other)
            .map(|s| (text[s.start..s.end()].to_string(), s.category))
            .collect()
    }

    #[test]
    fn test_c_line() {
        assert_eq!(
            spans_of("c", r#"int main() { return printf("if"); } // done"#),
            vec![
                ("int".to_string(), Category::Function),
                ("main".to_string(), Category::Function),
                ("return".to_string(), Category::Keyword),
                ("printf".to_string(), Category::Function),
                ("// done".to_string(), Category::Comment),
            ]
        );
    }

    #[test]
    fn test_c_unterminated_string_stays_on_its_line() {
        let def = parse_definition("c", definition_source("c").unwrap())
            .unwrap()
            .definition;
        let open = def.highlight_block(r#"puts("oops);"#, BlockState::NORMAL);
        assert_eq!(open.exit, BlockState::NORMAL);
        assert_eq!(
            spans_of("c", r#"puts("a \" b"); return;"#),
            vec![
                ("puts".to_string(), Category::Function),
                ("return".to_string(), Category::Keyword),
            ]
        );
    }

    #[test]
    fn test_rust_line() {
        assert_eq!(
            spans_of("rust", "pub fn run(x: Option<u8>) {"),
            vec![
                ("pub".to_string(), Category::Keyword),
                ("fn".to_string(), Category::Keyword),
                ("run".to_string(), Category::Function),
                ("Option".to_string(), Category::Function),
                ("u8".to_string(), Category::Function),
            ]
        );
    }

    #[test]
    fn test_python_line() {
        assert_eq!(
            spans_of("python", "def greet(): print('# not a comment')  # real"),
            vec![
                ("def".to_string(), Category::Keyword),
                ("greet".to_string(), Category::Function),
                ("print".to_string(), Category::Function),
                ("# real".to_string(), Category::Comment),
            ]
        );
    }
}
