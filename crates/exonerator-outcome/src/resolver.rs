//! Outcome resolution
//!
//! ```text
//! (address, date) ─► input checks ─► backend checks ─► coverage checks ─► answer
//!                    StartPage        Unreachable       NoData             Positive
//!                    Missing*         (no lookup)       OutOfRange         SameNetwork
//!                    Invalid*                           NoConsensus        Negative
//!                    TooRecent
//! ```
//!
//! The first matching rule wins. Resolution is pure: the same inputs and
//! the same `today` always give the same state.

use crate::echo::{truncate_echo, MAX_ADDRESS_ECHO, MAX_DATE_ECHO};
use crate::outcome::{OutcomeState, RelatedAddress};
use chrono::NaiveDate;
use exonerator_core::{
    last_available_date, CanonicalAddress, IpAddress, LookupData, LookupResult, ValidatedDate,
};

/// Map validated inputs and the lookup result to exactly one state.
///
/// `lookup` is `None` when the backend was not queried.
pub fn resolve(
    address: &CanonicalAddress,
    date: &ValidatedDate,
    lookup: Option<&LookupResult>,
    today: NaiveDate,
) -> OutcomeState {
    let (ip, requested) = match (address, date) {
        (CanonicalAddress::Empty, ValidatedDate::Empty) => return OutcomeState::StartPage,
        (CanonicalAddress::Empty, _) => return OutcomeState::MissingAddress,
        (_, ValidatedDate::Empty) => return OutcomeState::MissingDate,
        (CanonicalAddress::Invalid { raw }, _) => {
            return OutcomeState::InvalidAddress {
                echo: truncate_echo(raw, MAX_ADDRESS_ECHO),
            }
        }
        (_, ValidatedDate::Invalid { raw }) => {
            return OutcomeState::InvalidDate {
                echo: truncate_echo(raw, MAX_DATE_ECHO),
            }
        }
        (CanonicalAddress::Valid(_), ValidatedDate::Valid { too_recent: true, .. }) => {
            return OutcomeState::DateTooRecent
        }
        (CanonicalAddress::Valid(ip), ValidatedDate::Valid { date, too_recent: false, .. }) => {
            (ip, *date)
        }
    };

    let data = match lookup {
        None | Some(LookupResult::Unreachable) => return OutcomeState::BackendUnreachable,
        Some(LookupResult::Reachable(data)) => data,
    };

    let Some((first, last)) = data.coverage.bounds() else {
        return OutcomeState::NoDataInDatabase;
    };

    if requested < first || requested > last {
        return OutcomeState::DateOutOfRange {
            requested,
            first,
            last: last.min(last_available_date(today)),
        };
    }

    if !data.has_relevant_data {
        return OutcomeState::NoConsensusForInterval;
    }

    answer(ip, requested, data)
}

/// Pick between the positive, same-network and negative answers
fn answer(ip: &IpAddress, date: NaiveDate, data: &LookupData) -> OutcomeState {
    let address = ip.display();

    if !data.matches.is_empty() {
        return OutcomeState::PositiveMatch {
            address,
            date,
            matches: data.matches.clone(),
        };
    }

    if !data.related_addresses.is_empty() {
        return OutcomeState::NegativeSameNetwork {
            address,
            date,
            prefix_len: ip.network_prefix_len(),
            related: data
                .related_addresses
                .iter()
                .map(|related| RelatedAddress::new(related, date))
                .collect(),
        };
    }

    OutcomeState::NegativeNoMatch { address, date }
}
