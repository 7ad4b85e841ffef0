//! Outcome states shown to the user
//!
//! Exactly one state is produced per request. Each variant carries only
//! what its summary needs.

use chrono::NaiveDate;
use exonerator_core::{CanonicalAddress, MatchRecord, ValidatedDate};
use serde::Serialize;
use std::fmt;
use url::form_urlencoded;

/// The resolved outcome of one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeState {
    /// Neither address nor date given
    StartPage,

    MissingAddress,

    MissingDate,

    InvalidAddress {
        /// Offending parameter, length-capped
        echo: String,
    },

    InvalidDate {
        echo: String,
    },

    /// The database is not complete for the last couple of days
    DateTooRecent,

    BackendUnreachable,

    /// The backend answered but holds no data at all
    NoDataInDatabase,

    DateOutOfRange {
        requested: NaiveDate,
        first: NaiveDate,
        /// Last covered date, capped at the last available date
        last: NaiveDate,
    },

    /// No consensuses were published around the requested date
    NoConsensusForInterval,

    PositiveMatch {
        /// Display form of the queried address
        address: String,
        date: NaiveDate,
        matches: Vec<MatchRecord>,
    },

    NegativeSameNetwork {
        address: String,
        date: NaiveDate,
        /// 24 for IPv4, 48 for IPv6
        prefix_len: u8,
        related: Vec<RelatedAddress>,
    },

    NegativeNoMatch {
        address: String,
        date: NaiveDate,
    },
}

/// Fieldless discriminant of [`OutcomeState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    StartPage,
    MissingAddress,
    MissingDate,
    InvalidAddress,
    InvalidDate,
    DateTooRecent,
    BackendUnreachable,
    NoDataInDatabase,
    DateOutOfRange,
    NoConsensusForInterval,
    PositiveMatch,
    NegativeSameNetwork,
    NegativeNoMatch,
}

impl OutcomeKind {
    pub const ALL: [OutcomeKind; 13] = [
        OutcomeKind::StartPage,
        OutcomeKind::MissingAddress,
        OutcomeKind::MissingDate,
        OutcomeKind::InvalidAddress,
        OutcomeKind::InvalidDate,
        OutcomeKind::DateTooRecent,
        OutcomeKind::BackendUnreachable,
        OutcomeKind::NoDataInDatabase,
        OutcomeKind::DateOutOfRange,
        OutcomeKind::NoConsensusForInterval,
        OutcomeKind::PositiveMatch,
        OutcomeKind::NegativeSameNetwork,
        OutcomeKind::NegativeNoMatch,
    ];

    /// Stable snake_case name, used for templates, logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::StartPage => "start_page",
            OutcomeKind::MissingAddress => "missing_address",
            OutcomeKind::MissingDate => "missing_date",
            OutcomeKind::InvalidAddress => "invalid_address",
            OutcomeKind::InvalidDate => "invalid_date",
            OutcomeKind::DateTooRecent => "date_too_recent",
            OutcomeKind::BackendUnreachable => "backend_unreachable",
            OutcomeKind::NoDataInDatabase => "no_data_in_database",
            OutcomeKind::DateOutOfRange => "date_out_of_range",
            OutcomeKind::NoConsensusForInterval => "no_consensus_for_interval",
            OutcomeKind::PositiveMatch => "positive_match",
            OutcomeKind::NegativeSameNetwork => "negative_same_network",
            OutcomeKind::NegativeNoMatch => "negative_no_match",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OutcomeState {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            OutcomeState::StartPage => OutcomeKind::StartPage,
            OutcomeState::MissingAddress => OutcomeKind::MissingAddress,
            OutcomeState::MissingDate => OutcomeKind::MissingDate,
            OutcomeState::InvalidAddress { .. } => OutcomeKind::InvalidAddress,
            OutcomeState::InvalidDate { .. } => OutcomeKind::InvalidDate,
            OutcomeState::DateTooRecent => OutcomeKind::DateTooRecent,
            OutcomeState::BackendUnreachable => OutcomeKind::BackendUnreachable,
            OutcomeState::NoDataInDatabase => OutcomeKind::NoDataInDatabase,
            OutcomeState::DateOutOfRange { .. } => OutcomeKind::DateOutOfRange,
            OutcomeState::NoConsensusForInterval => OutcomeKind::NoConsensusForInterval,
            OutcomeState::PositiveMatch { .. } => OutcomeKind::PositiveMatch,
            OutcomeState::NegativeSameNetwork { .. } => OutcomeKind::NegativeSameNetwork,
            OutcomeState::NegativeNoMatch { .. } => OutcomeKind::NegativeNoMatch,
        }
    }

    /// Whether the address input should be highlighted as erroneous
    pub fn address_field_error(&self) -> bool {
        matches!(
            self,
            OutcomeState::MissingAddress | OutcomeState::InvalidAddress { .. }
        )
    }

    /// Whether the date input should be highlighted as erroneous
    pub fn date_field_error(&self) -> bool {
        matches!(
            self,
            OutcomeState::MissingDate
                | OutcomeState::InvalidDate { .. }
                | OutcomeState::DateOutOfRange { .. }
        )
    }

    /// Whether language links should repeat the query. Holds once the
    /// backend has answered with coverage for valid inputs.
    pub fn repeats_query(&self) -> bool {
        matches!(
            self,
            OutcomeState::DateOutOfRange { .. }
                | OutcomeState::NoConsensusForInterval
                | OutcomeState::PositiveMatch { .. }
                | OutcomeState::NegativeSameNetwork { .. }
                | OutcomeState::NegativeNoMatch { .. }
        )
    }

    /// Query to repeat this result, for the three answer states
    pub fn permanent_query(&self) -> Option<Requery> {
        match self {
            OutcomeState::PositiveMatch { address, date, .. }
            | OutcomeState::NegativeSameNetwork { address, date, .. }
            | OutcomeState::NegativeNoMatch { address, date } => {
                Some(Requery::new(address.clone(), *date))
            }
            _ => None,
        }
    }
}

/// Address and date parameters of a follow-up query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requery {
    pub ip: String,
    pub timestamp: String,
}

impl Requery {
    pub fn new(ip: String, date: NaiveDate) -> Self {
        Self {
            ip,
            timestamp: date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Form-urlencoded `ip=..&timestamp=..&lang=..`
    pub fn query_string(&self, lang: &str) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("ip", &self.ip)
            .append_pair("timestamp", &self.timestamp)
            .append_pair("lang", lang)
            .finish()
    }
}

/// An address in the same network as the queried one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedAddress {
    /// Display form; IPv6 addresses are bracketed
    pub display: String,
    /// Query for the same date with this address
    pub requery: Requery,
}

impl RelatedAddress {
    pub fn new(address: &str, date: NaiveDate) -> Self {
        let display = if address.contains(':') {
            format!("[{}]", address.replace(|c: char| c == '[' || c == ']', ""))
        } else {
            address.to_string()
        };
        Self {
            requery: Requery::new(display.clone(), date),
            display,
        }
    }
}

/// Parsed inputs echoed back into the search form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryEcho {
    /// Display form of a valid address
    pub address: Option<String>,
    /// ISO form of a valid date
    pub date: Option<String>,
}

impl QueryEcho {
    pub fn from_inputs(address: &CanonicalAddress, date: &ValidatedDate) -> Self {
        Self {
            address: address.as_valid().map(|a| a.display()),
            date: date.as_canonical(),
        }
    }

    /// Same-parameter query, if both inputs were valid
    pub fn requery(&self) -> Option<Requery> {
        Some(Requery {
            ip: self.address.clone()?,
            timestamp: self.date.clone()?,
        })
    }
}
