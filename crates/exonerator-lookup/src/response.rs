//! Wire format of the backend's `query.json` response.
//!
//! Every field is optional. A field with an unexpected type decodes as
//! absent instead of failing the whole response; only a body that is not
//! a JSON object is rejected.

use chrono::NaiveDate;
use exonerator_core::{CoverageRange, ExitFlag, LookupData, MatchRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decoded `query.json` body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub first_date_in_database: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub last_date_in_database: Option<String>,

    /// Whether consensuses were published around the requested date
    #[serde(default, deserialize_with = "lenient")]
    pub relevant_statuses: Option<bool>,

    /// Match objects, decoded one by one in [`QueryResponse::into_lookup_data`]
    #[serde(default, deserialize_with = "lenient")]
    pub matches: Option<Vec<Value>>,

    #[serde(default, deserialize_with = "lenient")]
    pub nearby_addresses: Option<Vec<Value>>,
}

/// A single entry of the `matches` array
#[derive(Debug, Clone, Deserialize)]
struct RawMatch {
    timestamp: String,
    addresses: Vec<String>,
    fingerprint: String,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    exit: Option<bool>,
}

impl From<RawMatch> for MatchRecord {
    fn from(raw: RawMatch) -> Self {
        MatchRecord {
            timestamp: raw.timestamp,
            addresses: raw.addresses,
            fingerprint: raw.fingerprint,
            nickname: raw.nickname,
            exit: ExitFlag::from(raw.exit),
        }
    }
}

/// Decode a field, mapping any type mismatch to `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl QueryResponse {
    /// Parse a response body. Anything but a JSON object is rejected.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            object @ Value::Object(_) => serde_json::from_value(object),
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Convert into the structured lookup data used by the resolver
    pub fn into_lookup_data(self) -> LookupData {
        let coverage = CoverageRange::new(
            coverage_date("first_date_in_database", self.first_date_in_database),
            coverage_date("last_date_in_database", self.last_date_in_database),
        );

        let matches = self
            .matches
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<RawMatch>(value) {
                Ok(raw) => Some(MatchRecord::from(raw)),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping malformed match entry");
                    None
                }
            })
            .collect();

        let mut related_addresses: Vec<String> = Vec::new();
        for value in self.nearby_addresses.unwrap_or_default() {
            match value {
                Value::String(address) => {
                    if !related_addresses.contains(&address) {
                        related_addresses.push(address);
                    }
                }
                other => tracing::warn!(value = %other, "Dropping malformed nearby address"),
            }
        }

        LookupData {
            coverage,
            has_relevant_data: self.relevant_statuses.unwrap_or(false),
            matches,
            related_addresses,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn coverage_date(field: &str, value: Option<String>) -> Option<NaiveDate> {
    let value = value?;
    let parsed = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok();
    if parsed.is_none() && !value.trim().is_empty() {
        tracing::warn!(field, value = %value, "Ignoring malformed coverage date");
    }
    parsed
}
