//! Unified Error Model
use thiserror::Error;

/// Errors raised while building the process configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CONFIG/{name}: invalid value '{value}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("CONFIG/LANGUAGES: no supported languages configured")]
    NoLanguages,

    #[error("CONFIG/LANGUAGES: default language '{0}' is not in the supported set")]
    UnsupportedDefaultLanguage(String),
}
