//! Language resolution and definition loading
//!
//! Maps file names to language IDs through the extensions claimed by user
//! definitions and a static table for the built-ins, and loads (and
//! caches) the definition for an ID, either from a user definitions
//! directory or from the built-in set.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::builtin;
use super::definition::{declared_extensions, parse_definition};
use super::language::{LanguageDefinition, PLAIN_TEXT};
use crate::error::{Result, SyntaxError};

/// Extension to language ID mapping (extensions are lower-case)
const EXTENSIONS: &[(&str, &str)] = &[
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("cxx", "cpp"),
    ("c++", "cpp"),
    ("hpp", "cpp"),
    ("hh", "cpp"),
    ("hxx", "cpp"),
    ("h++", "cpp"),
    ("ino", "cpp"),
    ("rs", "rust"),
    ("py", "python"),
    ("pyw", "python"),
    ("pyi", "python"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("jsx", "javascript"),
    ("ts", "javascript"),
    ("tsx", "javascript"),
    ("sh", "shell"),
    ("bash", "shell"),
    ("zsh", "shell"),
    ("ksh", "shell"),
    ("md", "markdown"),
    ("markdown", "markdown"),
    ("mdown", "markdown"),
    ("mkd", "markdown"),
    ("toml", "toml"),
    ("txt", PLAIN_TEXT),
];

/// Map a file name to a language ID.
///
/// The extension is compared case-insensitively. Unknown or missing
/// extensions resolve to the plain-text ID.
pub fn resolve(file_name: &str) -> &'static str {
    let Some(ext) = extension_of(file_name) else {
        return PLAIN_TEXT;
    };
    EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(PLAIN_TEXT, |(_, id)| *id)
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Loads language definitions and keeps them cached by ID
#[derive(Debug, Default)]
pub struct LanguageResolver {
    /// Directory of `<id>.toml` files that override built-ins
    definitions_dir: Option<PathBuf>,
    /// Parsed definitions, shared with the highlighter
    cache: HashMap<String, Rc<LanguageDefinition>>,
}

impl LanguageResolver {
    /// Resolver over the built-in definitions only
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that looks in `dir` before the built-ins
    pub fn with_definitions_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            definitions_dir: Some(dir.into()),
            cache: HashMap::new(),
        }
    }

    /// Map a file name to a language ID.
    ///
    /// Extensions claimed by user definitions win over the built-in
    /// table; user files are tried in ID order.
    pub fn resolve(&self, file_name: &str) -> String {
        if let Some(ext) = extension_of(file_name) {
            for (id, path) in self.user_definitions() {
                let claimed = fs::read_to_string(&path)
                    .map_err(SyntaxError::from)
                    .and_then(|source| declared_extensions(&id, &source));
                match claimed {
                    Ok(exts) if exts.contains(&ext) => return id,
                    Ok(_) => {}
                    Err(e) => tracing::debug!(path = %path.display(), "ignoring definition for detection: {}", e),
                }
            }
        }
        resolve(file_name).to_string()
    }

    /// Load the definition for a language ID.
    ///
    /// `plaintext` always succeeds. Unknown IDs fail with
    /// `DefinitionNotFound`, structurally invalid sources with
    /// `DefinitionMalformed`. Rules with invalid patterns are skipped
    /// with a warning; the rest of the definition still loads.
    pub fn load(&mut self, id: &str) -> Result<Rc<LanguageDefinition>> {
        let id = id.trim().to_lowercase();
        if let Some(def) = self.cache.get(&id) {
            return Ok(Rc::clone(def));
        }

        let definition = if id == PLAIN_TEXT {
            LanguageDefinition::plain_text()
        } else {
            let source = self.source(&id)?;
            let loaded = parse_definition(&id, &source)?;
            for warning in &loaded.warnings {
                tracing::warn!("{}", warning);
            }
            loaded.definition
        };

        tracing::info!(language = %id, rules = definition.rules().len(), "loaded language definition");
        let definition = Rc::new(definition);
        self.cache.insert(id, Rc::clone(&definition));
        Ok(definition)
    }

    /// Drop a cached definition so the next load re-reads its source
    pub fn invalidate(&mut self, id: &str) {
        self.cache.remove(&id.trim().to_lowercase());
    }

    /// IDs that can be loaded, sorted
    pub fn available(&self) -> Vec<String> {
        let mut ids: Vec<String> = builtin::definition_ids().map(str::to_string).collect();
        ids.push(PLAIN_TEXT.to_string());

        ids.extend(self.user_definitions().into_iter().map(|(id, _)| id));

        ids.sort();
        ids.dedup();
        ids
    }

    /// `(id, path)` of every `<id>.toml` in the user directory, sorted by ID
    fn user_definitions(&self) -> Vec<(String, PathBuf)> {
        let Some(dir) = &self.definitions_dir else {
            return Vec::new();
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut found: Vec<(String, PathBuf)> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "toml"))
            .filter_map(|path| {
                let id = path.file_stem()?.to_str()?.to_lowercase();
                Some((id, path))
            })
            .collect();
        found.sort();
        found
    }

    /// Find the definition source for an ID
    fn source(&self, id: &str) -> Result<String> {
        if let Some(dir) = &self.definitions_dir {
            let path = dir.join(format!("{}.toml", id));
            if path.is_file() {
                tracing::debug!(path = %path.display(), "reading user definition");
                return Ok(fs::read_to_string(&path)?);
            }
        }
        builtin::definition_source(id)
            .map(str::to_string)
            .ok_or_else(|| SyntaxError::DefinitionNotFound(id.to_string()))
    }
}
