//! ExoneraTor-IN: validation of untrusted query parameters
//!
//! Turns the raw `ip` and `timestamp` parameters into tagged values that
//! are either empty, invalid (keeping the raw text for echo) or valid.
//! Nothing in this crate fails or panics on user input.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use exonerator_in::{parse_query, QueryParams};
//!
//! let params = QueryParams::from_pairs(vec![
//!     ("ip".to_string(), "086.059.021.038".to_string()),
//!     ("timestamp".to_string(), "2020-01-01".to_string()),
//! ]);
//! let today = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
//! let parsed = parse_query(&params, today);
//! assert_eq!(parsed.address.as_valid().unwrap().canonical(), "86.59.21.38");
//! ```

pub mod address;
pub mod date;

pub use address::canonicalize;
pub use date::{parse_date, validate};

use chrono::NaiveDate;
use exonerator_core::{CanonicalAddress, ValidatedDate};

/// Raw query parameters as received from the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub ip: Option<String>,
    pub timestamp: Option<String>,
    pub lang: Option<String>,
}

impl QueryParams {
    /// Collect the known parameters from decoded key/value pairs. The
    /// first occurrence of a key wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = QueryParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "ip" => &mut params.ip,
                "timestamp" => &mut params.timestamp,
                "lang" => &mut params.lang,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Validated form of the address and date parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub address: CanonicalAddress,
    pub date: ValidatedDate,
}

/// Canonicalize the address and validate the date independently
pub fn parse_query(params: &QueryParams, today: NaiveDate) -> ParsedQuery {
    ParsedQuery {
        address: canonicalize(params.ip.as_deref()),
        date: validate(params.timestamp.as_deref(), today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_first_occurrence_wins() {
        let params = QueryParams::from_pairs(vec![
            pair("ip", "1.2.3.4"),
            pair("ip", "5.6.7.8"),
            pair("utm", "x"),
            pair("lang", "de"),
        ]);
        assert_eq!(params.ip.as_deref(), Some("1.2.3.4"));
        assert_eq!(params.lang.as_deref(), Some("de"));
        assert_eq!(params.timestamp, None);
    }

    #[test]
    fn test_parse_query_independent() {
        let today = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let parsed = parse_query(
            &QueryParams::from_pairs(vec![pair("ip", "nonsense"), pair("timestamp", "2020-01-01")]),
            today,
        );
        assert!(matches!(parsed.address, CanonicalAddress::Invalid { .. }));
        assert!(matches!(parsed.date, ValidatedDate::Valid { .. }));
    }
}
