//! Integration tests for the outcome resolver.
//!
//! Covers the documented query scenarios and checks that every input
//! combination resolves to exactly one state without panicking.

use chrono::NaiveDate;
use exonerator_core::{
    CanonicalAddress, CoverageRange, ExitFlag, IpAddress, LookupData, LookupResult, MatchRecord,
    ValidatedDate,
};
use exonerator_outcome::{resolve, OutcomeKind, OutcomeState, QueryEcho};
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2021, 3, 10)
}

fn valid(d: NaiveDate, too_recent: bool) -> ValidatedDate {
    ValidatedDate::Valid {
        date: d,
        raw: d.format("%Y-%m-%d").to_string(),
        too_recent,
    }
}

fn coverage() -> CoverageRange {
    CoverageRange::new(Some(date(2005, 1, 1)), Some(date(2020, 1, 1)))
}

fn record(address: &str) -> MatchRecord {
    MatchRecord {
        timestamp: "2019-06-01 12:00:00".to_string(),
        addresses: vec![address.to_string()],
        fingerprint: "9695DFC35FFEB861329B9F1AB04C46397020CE31".to_string(),
        nickname: None,
        exit: ExitFlag::Yes,
    }
}

fn reachable(matches: Vec<MatchRecord>, related: Vec<&str>) -> LookupResult {
    LookupResult::Reachable(LookupData {
        coverage: coverage(),
        has_relevant_data: true,
        matches,
        related_addresses: related.into_iter().map(String::from).collect(),
    })
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_start_page() {
    let state = resolve(&CanonicalAddress::Empty, &ValidatedDate::Empty, None, today());
    assert_eq!(state, OutcomeState::StartPage);
    assert!(!state.address_field_error());
    assert!(!state.date_field_error());
    assert_eq!(state.permanent_query(), None);
}

#[test]
fn test_invalid_ipv4_octet() {
    let address = invalid("999.1.1.1");
    let state = resolve(&address, &valid(date(2019, 6, 1), false), None, today());
    assert_eq!(state, OutcomeState::InvalidAddress { echo: "999.1.1.1".to_string() });
    assert!(state.address_field_error());
}

fn invalid(raw: &str) -> CanonicalAddress {
    CanonicalAddress::Invalid { raw: raw.to_string() }
}

#[test]
fn test_invalid_address_echo_truncated_at_41_chars() {
    let raw = "x".repeat(41);
    let state = resolve(&invalid(&raw), &ValidatedDate::Empty, None, today());
    // Missing date takes precedence over the invalid address.
    assert_eq!(state.kind(), OutcomeKind::MissingDate);

    let state = resolve(&invalid(&raw), &valid(date(2019, 6, 1), false), None, today());
    assert_eq!(
        state,
        OutcomeState::InvalidAddress { echo: format!("{}[...]", "x".repeat(40)) }
    );
}

#[test]
fn test_out_of_range_with_capped_last_date() {
    let address = CanonicalAddress::Valid(IpAddress::from_octets([86, 59, 21, 38]));
    let lookup = LookupResult::Reachable(LookupData {
        coverage: CoverageRange::new(Some(date(2005, 1, 1)), Some(date(2021, 3, 10))),
        has_relevant_data: true,
        ..LookupData::default()
    });

    let state = resolve(&address, &valid(date(2004, 12, 31), false), Some(&lookup), today());
    assert_eq!(
        state,
        OutcomeState::DateOutOfRange {
            requested: date(2004, 12, 31),
            first: date(2005, 1, 1),
            last: date(2021, 3, 8),
        }
    );
    assert!(state.date_field_error());
    assert!(!state.address_field_error());
}

#[test]
fn test_positive_match_single_record() {
    let address = CanonicalAddress::Valid(IpAddress::from_octets([86, 59, 21, 38]));
    let lookup = reachable(vec![record("86.59.21.38")], vec![]);
    let state = resolve(&address, &valid(date(2019, 6, 1), false), Some(&lookup), today());

    let OutcomeState::PositiveMatch { address, date: d, matches } = &state else {
        panic!("expected a positive match, got {:?}", state);
    };
    assert_eq!(address, "86.59.21.38");
    assert_eq!(*d, date(2019, 6, 1));
    assert_eq!(matches.len(), 1);

    let requery = state.permanent_query().unwrap();
    assert_eq!(
        requery.query_string("en"),
        "ip=86.59.21.38&timestamp=2019-06-01&lang=en"
    );
}

#[test]
fn test_same_network_ipv4() {
    let address = CanonicalAddress::Valid(IpAddress::from_octets([86, 59, 21, 38]));
    let lookup = reachable(vec![], vec!["86.59.21.39", "86.59.21.40"]);
    let state = resolve(&address, &valid(date(2019, 6, 1), false), Some(&lookup), today());

    let OutcomeState::NegativeSameNetwork { prefix_len, related, .. } = &state else {
        panic!("expected a same-network answer, got {:?}", state);
    };
    assert_eq!(*prefix_len, 24);
    let shown: Vec<&str> = related.iter().map(|r| r.display.as_str()).collect();
    assert_eq!(shown, vec!["86.59.21.39", "86.59.21.40"]);
    assert_eq!(related[0].requery.ip, "86.59.21.39");
    assert_eq!(related[0].requery.timestamp, "2019-06-01");
}

#[test]
fn test_same_network_ipv6_requery_bracketed() {
    let address = CanonicalAddress::Valid(IpAddress::from_groups([0x2001, 0xdb8, 1, 0, 0, 0, 0, 1]));
    let lookup = reachable(vec![], vec!["2001:db8:1::2"]);
    let state = resolve(&address, &valid(date(2019, 6, 1), false), Some(&lookup), today());

    let OutcomeState::NegativeSameNetwork { prefix_len, related, .. } = &state else {
        panic!("expected a same-network answer, got {:?}", state);
    };
    assert_eq!(*prefix_len, 48);
    assert_eq!(related[0].requery.ip, "[2001:db8:1::2]");
}

#[test]
fn test_negative_no_match_has_permanent_link() {
    let address = CanonicalAddress::Valid(IpAddress::from_octets([10, 0, 0, 1]));
    let lookup = reachable(vec![], vec![]);
    let state = resolve(&address, &valid(date(2019, 6, 1), false), Some(&lookup), today());
    assert_eq!(
        state,
        OutcomeState::NegativeNoMatch {
            address: "10.0.0.1".to_string(),
            date: date(2019, 6, 1),
        }
    );
    assert!(state.permanent_query().is_some());
}

#[test]
fn test_query_echo_for_form() {
    let address = CanonicalAddress::Valid(IpAddress::from_groups([0, 0, 0, 0, 0, 0, 0, 1]));
    let echo = QueryEcho::from_inputs(&address, &valid(date(2019, 6, 1), false));
    assert_eq!(
        echo.address.as_deref(),
        Some("[0000:0000:0000:0000:0000:0000:0000:0001]")
    );
    assert_eq!(echo.date.as_deref(), Some("2019-06-01"));
}

// =============================================================================
// Totality
// =============================================================================

#[test]
fn test_every_combination_resolves() {
    let addresses = vec![
        CanonicalAddress::Empty,
        CanonicalAddress::Invalid { raw: "nope".to_string() },
        CanonicalAddress::Valid(IpAddress::from_octets([1, 2, 3, 4])),
        CanonicalAddress::Valid(IpAddress::from_groups([0x2001, 0xdb8, 0, 0, 0, 0, 0, 1])),
    ];
    let dates = vec![
        ValidatedDate::Empty,
        ValidatedDate::Invalid { raw: "2021-13-01".to_string() },
        valid(date(2019, 6, 1), false),
        valid(date(2004, 6, 1), false),
        valid(date(2021, 3, 10), true),
    ];
    let no_data = LookupResult::Reachable(LookupData::default());
    let quiet = LookupResult::Reachable(LookupData {
        coverage: coverage(),
        ..LookupData::default()
    });
    let lookups = vec![
        None,
        Some(LookupResult::Unreachable),
        Some(no_data),
        Some(quiet),
        Some(reachable(vec![record("1.2.3.4")], vec![])),
        Some(reachable(vec![], vec!["1.2.3.5"])),
        Some(reachable(vec![], vec![])),
    ];

    let mut seen = HashSet::new();
    for address in &addresses {
        for d in &dates {
            for lookup in &lookups {
                let state = resolve(address, d, lookup.as_ref(), today());
                seen.insert(state.kind());

                // Field errors never point at a field the user got right.
                if state.address_field_error() {
                    assert!(address.as_valid().is_none());
                }
                if state.permanent_query().is_some() {
                    assert!(address.as_valid().is_some());
                    assert!(d.queryable().is_some());
                }
            }
        }
    }

    for kind in OutcomeKind::ALL {
        assert!(seen.contains(&kind), "never produced {}", kind);
    }
}

#[test]
fn test_lookup_ignored_until_inputs_are_queryable() {
    let lookup = reachable(vec![record("1.2.3.4")], vec![]);
    let address = CanonicalAddress::Valid(IpAddress::from_octets([1, 2, 3, 4]));

    for d in [
        ValidatedDate::Empty,
        ValidatedDate::Invalid { raw: "x".to_string() },
        valid(date(2021, 3, 9), true),
    ] {
        let state = resolve(&address, &d, Some(&lookup), today());
        assert_ne!(state.kind(), OutcomeKind::PositiveMatch);
    }
}
