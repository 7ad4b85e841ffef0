//! Data Model: addresses, dates, coverage and lookup results
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Number of days before "today" for which the database is assumed
/// to be incomplete.
pub const TOO_RECENT_DAYS: u64 = 2;

/// Latest date the database is expected to cover completely, given
/// today's UTC date.
pub fn last_available_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(TOO_RECENT_DAYS))
        .unwrap_or(NaiveDate::MIN)
}

/// Address family of a validated address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

/// A syntactically valid IP address in canonical form.
///
/// IPv4 addresses are kept in dotted-decimal notation without leading
/// zeros. IPv6 addresses are kept as 32 lower-case hex digits without
/// separators; use [`IpAddress::expanded`] or [`IpAddress::display`] for
/// colon-delimited forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IpAddress {
    family: AddressFamily,
    canonical: String,
}

impl IpAddress {
    /// Build an IPv4 address from its four octets
    pub fn from_octets(octets: [u8; 4]) -> Self {
        Self {
            family: AddressFamily::Ipv4,
            canonical: format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3]),
        }
    }

    /// Build an IPv6 address from its eight 16-bit groups
    pub fn from_groups(groups: [u16; 8]) -> Self {
        let canonical = groups.iter().map(|g| format!("{:04x}", g)).collect();
        Self {
            family: AddressFamily::Ipv6,
            canonical,
        }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// Canonical string used for comparisons
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Fully expanded textual form; IPv6 groups are separated by colons.
    pub fn expanded(&self) -> String {
        match self.family {
            AddressFamily::Ipv4 => self.canonical.clone(),
            AddressFamily::Ipv6 => self
                .canonical
                .as_bytes()
                .chunks(4)
                .map(|group| String::from_utf8_lossy(group).into_owned())
                .collect::<Vec<_>>()
                .join(":"),
        }
    }

    /// Form shown to users; IPv6 addresses are wrapped in brackets.
    pub fn display(&self) -> String {
        match self.family {
            AddressFamily::Ipv4 => self.canonical.clone(),
            AddressFamily::Ipv6 => format!("[{}]", self.expanded()),
        }
    }

    /// Prefix length of the network the backend searches for related
    /// addresses.
    pub fn network_prefix_len(&self) -> u8 {
        match self.family {
            AddressFamily::Ipv4 => 24,
            AddressFamily::Ipv6 => 48,
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Outcome of canonicalizing the address parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CanonicalAddress {
    /// No address was supplied
    Empty,
    /// An address was supplied but could not be parsed
    Invalid {
        /// The parameter exactly as received
        raw: String,
    },
    Valid(IpAddress),
}

impl CanonicalAddress {
    pub fn is_empty(&self) -> bool {
        matches!(self, CanonicalAddress::Empty)
    }

    pub fn as_valid(&self) -> Option<&IpAddress> {
        match self {
            CanonicalAddress::Valid(address) => Some(address),
            _ => None,
        }
    }
}

/// Outcome of validating the date parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidatedDate {
    Empty,
    Invalid {
        raw: String,
    },
    Valid {
        date: NaiveDate,
        raw: String,
        /// Set when the date lies within the last [`TOO_RECENT_DAYS`] days
        too_recent: bool,
    },
}

impl ValidatedDate {
    pub fn is_empty(&self) -> bool {
        matches!(self, ValidatedDate::Empty)
    }

    /// The parameter exactly as received, if any
    pub fn as_requested(&self) -> Option<&str> {
        match self {
            ValidatedDate::Empty => None,
            ValidatedDate::Invalid { raw } | ValidatedDate::Valid { raw, .. } => Some(raw),
        }
    }

    /// ISO `YYYY-MM-DD` rendering of a valid date
    pub fn as_canonical(&self) -> Option<String> {
        self.date().map(|date| date.format("%Y-%m-%d").to_string())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ValidatedDate::Valid { date, .. } => Some(*date),
            _ => None,
        }
    }

    pub fn is_too_recent(&self) -> bool {
        matches!(self, ValidatedDate::Valid { too_recent: true, .. })
    }

    /// The date, if it is valid and old enough to be looked up
    pub fn queryable(&self) -> Option<NaiveDate> {
        match self {
            ValidatedDate::Valid {
                date,
                too_recent: false,
                ..
            } => Some(*date),
            _ => None,
        }
    }
}

/// Span of dates for which the backend holds consensus data.
///
/// `None` on either side means the backend reported no data at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverageRange {
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
}

impl CoverageRange {
    pub fn new(first: Option<NaiveDate>, last: Option<NaiveDate>) -> Self {
        Self { first, last }
    }

    /// Both bounds, if the backend reported any data
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first?, self.last?))
    }
}

/// Whether a relay had the Exit flag in a consensus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitFlag {
    #[default]
    Unknown,
    Yes,
    No,
}

impl From<Option<bool>> for ExitFlag {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => ExitFlag::Unknown,
            Some(true) => ExitFlag::Yes,
            Some(false) => ExitFlag::No,
        }
    }
}

/// A single consensus entry matching the queried address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Consensus valid-after time as reported by the backend
    pub timestamp: String,
    pub addresses: Vec<String>,
    pub fingerprint: String,
    pub nickname: Option<String>,
    pub exit: ExitFlag,
}

/// Data returned by a reachable backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupData {
    pub coverage: CoverageRange,
    /// Whether the backend had consensuses around the requested date
    pub has_relevant_data: bool,
    pub matches: Vec<MatchRecord>,
    /// Addresses in the same network as the queried one, in backend order
    pub related_addresses: Vec<String>,
}

/// Result of one round trip to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum LookupResult {
    /// The backend could not be contacted or sent an undecodable response
    Unreachable,
    Reachable(LookupData),
}
