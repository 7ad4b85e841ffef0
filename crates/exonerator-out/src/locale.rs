//! Localized string tables.
//!
//! One YAML table per language. Strings missing from a table fall back to
//! the default language's table.

use crate::RenderError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// English table shipped with the crate
pub const EMBEDDED_ENGLISH: &str = include_str!("../locales/en.yaml");

pub const EMBEDDED_LANGUAGE: &str = "en";

/// Key holding a language's own name, used for the footer links
pub const LANGUAGE_NAME_KEY: &str = "footer_language_name";

#[derive(Debug, Clone, Deserialize)]
pub struct LocaleTable {
    pub version: String,
    pub language: String,
    pub strings: BTreeMap<String, String>,
}

impl LocaleTable {
    pub fn embedded() -> Result<Self, RenderError> {
        Self::from_yaml(EMBEDDED_ENGLISH)
    }

    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RenderError::Locale(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, RenderError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| RenderError::Locale(format!("invalid locale YAML: {}", e)))
    }

    /// The language's name for itself, or its tag
    pub fn name(&self) -> &str {
        self.strings
            .get(LANGUAGE_NAME_KEY)
            .map(|s| s.as_str())
            .unwrap_or(&self.language)
    }
}

/// The string tables of all supported languages
#[derive(Debug, Clone)]
pub struct LocaleSet {
    default_language: String,
    tables: BTreeMap<String, LocaleTable>,
}

impl LocaleSet {
    /// English only
    pub fn embedded() -> Result<Self, RenderError> {
        Self::from_tables(EMBEDDED_LANGUAGE, vec![LocaleTable::embedded()?])
    }

    /// Load a table for every language in `languages`.
    ///
    /// `<tag>.yaml` in `dir` takes precedence; English falls back to the
    /// embedded table. Any other language without a file is an error.
    pub fn load(
        languages: &[String],
        default_language: &str,
        dir: Option<&Path>,
    ) -> Result<Self, RenderError> {
        let mut tables = Vec::with_capacity(languages.len());
        for lang in languages {
            let candidate = dir.map(|dir| dir.join(format!("{}.yaml", lang)));
            let table = match candidate {
                Some(path) if path.is_file() => LocaleTable::load(&path)?,
                _ if lang == EMBEDDED_LANGUAGE => LocaleTable::embedded()?,
                _ => {
                    return Err(RenderError::Locale(format!(
                        "no string table for language '{}'",
                        lang
                    )))
                }
            };
            tracing::debug!(lang = %lang, strings = table.strings.len(), "Loaded string table");
            tables.push(table);
        }
        Self::from_tables(default_language, tables)
    }

    pub fn from_tables(
        default_language: &str,
        tables: Vec<LocaleTable>,
    ) -> Result<Self, RenderError> {
        let tables: BTreeMap<String, LocaleTable> = tables
            .into_iter()
            .map(|table| (table.language.clone(), table))
            .collect();
        if !tables.contains_key(default_language) {
            return Err(RenderError::Locale(format!(
                "no string table for default language '{}'",
                default_language
            )));
        }
        Ok(Self {
            default_language: default_language.to_string(),
            tables,
        })
    }

    /// `lang` if a table exists for it, else the default language
    pub fn effective<'a>(&'a self, lang: &'a str) -> &'a str {
        if self.tables.contains_key(lang) {
            lang
        } else {
            &self.default_language
        }
    }

    /// (tag, name) pairs sorted by tag
    pub fn languages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tables
            .iter()
            .map(|(tag, table)| (tag.as_str(), table.name()))
    }

    /// Look up one string
    pub fn get(&self, lang: &str, key: &str) -> Result<&str, RenderError> {
        self.tables
            .get(lang)
            .and_then(|table| table.strings.get(key))
            .or_else(|| {
                self.tables
                    .get(&self.default_language)
                    .and_then(|table| table.strings.get(key))
            })
            .map(|s| s.as_str())
            .ok_or_else(|| RenderError::Locale(format!("missing string '{}'", key)))
    }

    /// All strings for `lang`, with gaps filled from the default language
    pub fn strings(&self, lang: &str) -> BTreeMap<String, String> {
        let mut merged = self
            .tables
            .get(&self.default_language)
            .map(|table| table.strings.clone())
            .unwrap_or_default();
        if let Some(table) = self.tables.get(lang) {
            merged.extend(table.strings.clone());
        }
        merged
    }
}
