//! Error types for the highlighting engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Errors raised while loading language definitions, themes and
/// configuration.
///
/// None of these are fatal: the worst outcome is plain highlighting.
/// The highlighting pass itself never returns an error.
#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No language definition for '{0}'")]
    DefinitionNotFound(String),

    #[error("Malformed definition '{language}': {reason}")]
    DefinitionMalformed { language: String, reason: String },

    #[error("Invalid pattern in rule '{rule}' of '{language}': {reason}")]
    PatternInvalid {
        language: String,
        rule: String,
        reason: String,
    },

    #[error("Malformed theme: {0}")]
    ThemeMalformed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SyntaxError {
    /// Shorthand for a malformed definition
    pub fn malformed(language: &str, reason: impl Into<String>) -> Self {
        SyntaxError::DefinitionMalformed {
            language: language.to_string(),
            reason: reason.into(),
        }
    }
}
