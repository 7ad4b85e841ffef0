//! Process configuration, built once at startup and shared read-only.
//!
//! Values come from `EXONERATOR_*` environment variables. The lookup
//! function is injectable so configuration can be built from any source.
use crate::context::Clock;
use crate::error::ConfigError;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_BACKEND_URL: &str = "https://exonerator.torproject.org";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone)]
pub struct ExoneratorConfig {
    /// Socket address the web service binds to
    pub listen_addr: String,
    /// Base address of the consensus database service
    pub backend_url: Url,
    pub backend_timeout: Duration,
    /// Supported language tags, in configuration order
    pub languages: Vec<String>,
    pub default_language: String,
    /// Absolute base used for printed permanent links
    pub public_url: Option<String>,
    /// Directory holding additional `<tag>.yaml` string tables
    pub locales_dir: Option<PathBuf>,
    pub clock: Clock,
}

impl Default for ExoneratorConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend url is valid"),
            backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
            languages: vec![DEFAULT_LANGUAGE.to_string()],
            default_language: DEFAULT_LANGUAGE.to_string(),
            public_url: None,
            locales_dir: None,
            clock: Clock::System,
        }
    }
}

impl ExoneratorConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(addr) = get("EXONERATOR_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(raw) = get("EXONERATOR_BACKEND_URL") {
            config.backend_url = Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
                name: "EXONERATOR_BACKEND_URL",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
        }

        if let Some(raw) = get("EXONERATOR_BACKEND_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "EXONERATOR_BACKEND_TIMEOUT_SECS",
                value: raw.clone(),
                reason: "expected a whole number of seconds".to_string(),
            })?;
            config.backend_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = get("EXONERATOR_LANGUAGES") {
            let mut languages: Vec<String> = Vec::new();
            for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                if !is_language_tag(tag) {
                    return Err(ConfigError::InvalidValue {
                        name: "EXONERATOR_LANGUAGES",
                        value: tag.to_string(),
                        reason: "not a language tag".to_string(),
                    });
                }
                if !languages.iter().any(|known| known == tag) {
                    languages.push(tag.to_string());
                }
            }
            config.languages = languages;
        }

        if let Some(lang) = get("EXONERATOR_DEFAULT_LANGUAGE") {
            config.default_language = lang;
        }

        config.public_url = get("EXONERATOR_PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string());
        config.locales_dir = get("EXONERATOR_LOCALES_DIR").map(PathBuf::from);

        if let Some(raw) = get("EXONERATOR_TODAY") {
            let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| {
                ConfigError::InvalidValue {
                    name: "EXONERATOR_TODAY",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            config.clock = Clock::Fixed(date);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.languages.is_empty() {
            return Err(ConfigError::NoLanguages);
        }
        if !self.supports(&self.default_language) {
            return Err(ConfigError::UnsupportedDefaultLanguage(
                self.default_language.clone(),
            ));
        }
        Ok(())
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.languages.iter().any(|known| known == lang)
    }

    /// Pick the requested language if supported, else the default one
    pub fn select_language<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(lang) if self.supports(lang) => lang,
            _ => &self.default_language,
        }
    }
}

fn is_language_tag(tag: &str) -> bool {
    (2..=8).contains(&tag.len()) && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ExoneratorConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ExoneratorConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.backend_url.as_str(), "https://exonerator.torproject.org/");
        assert_eq!(config.languages, vec!["en".to_string()]);
        assert_eq!(config.backend_timeout, Duration::from_secs(10));
        assert_eq!(config.clock, Clock::System);
    }

    #[test]
    fn test_languages_parsed_and_deduplicated() {
        let config = config_from(&[("EXONERATOR_LANGUAGES", "de, en,fr,en")]).unwrap();
        assert_eq!(config.languages, vec!["de", "en", "fr"]);
        assert_eq!(config.select_language(Some("fr")), "fr");
        assert_eq!(config.select_language(Some("xx")), "en");
        assert_eq!(config.select_language(None), "en");
    }

    #[test]
    fn test_select_language_returns_requested_tag() {
        let config = config_from(&[("EXONERATOR_LANGUAGES", "en,de")]).unwrap();
        let requested = String::from("de");
        let lang = config.select_language(Some(requested.as_str()));
        assert_eq!(lang, "de");
        assert_eq!(config.select_language(Some("")), "en");
    }

    #[test]
    fn test_default_language_must_be_supported() {
        let err = config_from(&[("EXONERATOR_LANGUAGES", "de,fr")]).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedDefaultLanguage("en".to_string()));

        let config = config_from(&[
            ("EXONERATOR_LANGUAGES", "de,fr"),
            ("EXONERATOR_DEFAULT_LANGUAGE", "de"),
        ])
        .unwrap();
        assert_eq!(config.default_language, "de");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            config_from(&[("EXONERATOR_BACKEND_URL", "not a url")]),
            Err(ConfigError::InvalidValue { name: "EXONERATOR_BACKEND_URL", .. })
        ));
        assert!(matches!(
            config_from(&[("EXONERATOR_BACKEND_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config_from(&[("EXONERATOR_LANGUAGES", "en,<script>")]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_fixed_today_and_public_url() {
        let config = config_from(&[
            ("EXONERATOR_TODAY", "2020-03-04"),
            ("EXONERATOR_PUBLIC_URL", "https://exonerator.example/"),
        ])
        .unwrap();
        assert_eq!(
            config.clock,
            Clock::Fixed(NaiveDate::from_ymd_opt(2020, 3, 4).unwrap())
        );
        assert_eq!(config.public_url.as_deref(), Some("https://exonerator.example"));
    }
}
