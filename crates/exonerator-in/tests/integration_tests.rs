//! Integration tests for exonerator-in.
//!
//! Exercise the canonicalizer and the date validator through the public
//! API, including malformed and adversarial input.

use chrono::NaiveDate;
use exonerator_core::{AddressFamily, CanonicalAddress, ValidatedDate};
use exonerator_in::{canonicalize, parse_query, validate, QueryParams};

fn canonical(raw: &str) -> Option<String> {
    canonicalize(Some(raw))
        .as_valid()
        .map(|a| a.canonical().to_string())
}

fn assert_invalid(raw: &str) {
    assert_eq!(
        canonicalize(Some(raw)),
        CanonicalAddress::Invalid { raw: raw.to_string() },
        "accepted: {:?}",
        raw
    );
}

// =============================================================================
// IPv4
// =============================================================================

#[test]
fn test_ipv4_round_trip() {
    let first = canonicalize(Some("086.059.021.038"));
    let address = first.as_valid().unwrap();
    assert_eq!(address.canonical(), "86.59.21.38");
    assert_eq!(address.family(), AddressFamily::Ipv4);

    let second = canonicalize(Some(address.canonical()));
    assert_eq!(second, first);
}

#[test]
fn test_invalid_keeps_untrimmed_raw() {
    assert_eq!(
        canonicalize(Some(" 999.1.1.1 ")),
        CanonicalAddress::Invalid { raw: " 999.1.1.1 ".to_string() }
    );
}

// =============================================================================
// IPv6 expansion
// =============================================================================

#[test]
fn test_ipv6_loopback() {
    assert_eq!(
        canonical("::1").as_deref(),
        Some("00000000000000000000000000000001")
    );
}

#[test]
fn test_ipv6_gap_in_middle() {
    assert_eq!(
        canonical("2001:db8::1").as_deref(),
        Some("20010db8000000000000000000000001")
    );
}

#[test]
fn test_ipv6_trailing_gap() {
    assert_eq!(
        canonical("2001:db8::").as_deref(),
        Some("20010db8000000000000000000000000")
    );
}

#[test]
fn test_ipv6_brackets_and_case() {
    assert_eq!(
        canonical("[2001:DB8:0:0:8:800:200C:417A]").as_deref(),
        Some("20010db80000000000080800200c417a")
    );
    assert_eq!(canonical("[::1]"), canonical("::1"));
}

#[test]
fn test_ipv6_fully_expanded_input() {
    let raw = "2001:0db8:0000:0000:0000:0000:0000:0001";
    assert_eq!(canonical(raw), canonical("2001:db8::1"));
}

#[test]
fn test_ipv6_gap_of_one_group() {
    assert_eq!(
        canonical("1:2:3:4:5:6:7::").as_deref(),
        Some("00010002000300040005000600070000")
    );
    assert_eq!(
        canonical("::2:3:4:5:6:7:8").as_deref(),
        Some("00000002000300040005000600070008")
    );
}

#[test]
fn test_ipv6_round_trip_through_display_forms() {
    for raw in ["::1", "2001:db8::1", "fe80::1:2", "[2001:638:a000:4140::ffff:189]"] {
        let first = canonicalize(Some(raw));
        let address = first.as_valid().unwrap().clone();
        assert_eq!(canonicalize(Some(&address.expanded())), first, "expanded: {}", raw);
        assert_eq!(canonicalize(Some(&address.display())), first, "display: {}", raw);
    }
}

#[test]
fn test_ipv6_oversized_field() {
    assert_invalid("2001:db8::12345");
    assert_invalid("00001::");
}

#[test]
fn test_ipv6_double_compression() {
    assert_invalid("2001::db8::1");
    assert_invalid("::1::");
    assert_invalid(":::");
    assert_invalid("1:::2");
}

#[test]
fn test_ipv6_wrong_group_count() {
    assert_invalid("1:2:3:4:5:6:7");
    assert_invalid("1:2:3:4:5:6:7:8:9");
    assert_invalid("1:2:3:4:5:6:7:8::");
    assert_invalid("::1:2:3:4:5:6:7:8");
}

#[test]
fn test_ipv6_single_colon_at_edges_is_gap() {
    assert_eq!(
        canonical(":1:2:3:4:5:6:7").as_deref(),
        Some("00000001000200030004000500060007")
    );
    assert_eq!(
        canonical("1:2:3:4:5:6:7:").as_deref(),
        Some("00010002000300040005000600070000")
    );
    assert_invalid(":1:2:3:4:5:6:7:8");
    assert_invalid(":1:2:3:4:5:6:7:");
}

#[test]
fn test_ipv6_lone_colons() {
    assert_invalid(":");
    assert_invalid("::");
    assert_invalid("[::]");
}

#[test]
fn test_ipv6_unbalanced_brackets() {
    assert_invalid("[::1");
    assert_invalid("::1]");
    assert_invalid("[]");
    assert_invalid("[[::1]]");
}

#[test]
fn test_ipv6_non_hex() {
    assert_invalid("2001:db8::g");
    assert_invalid("2001:db8::1%eth0");
    assert_invalid("::ffff:1.2.3.4");
}

#[test]
fn test_adversarial_input_never_panics() {
    let long = "1:".repeat(10_000);
    assert_invalid(&long);
    assert_invalid(&"a".repeat(1_000_000));
    assert_invalid("\u{0}\u{1}\u{7f}");
    assert_invalid("<script>alert(1)</script>");
    assert_invalid("ü::1");
    assert_invalid("[\u{1F600}]");
}

// =============================================================================
// Dates
// =============================================================================

#[test]
fn test_date_boundary() {
    let today = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
    assert!(!validate(Some("2020-01-01"), today).is_too_recent());
    assert!(validate(Some("2020-01-02"), today).is_too_recent());
}

#[test]
fn test_date_invalid_keeps_raw() {
    let today = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
    assert_eq!(
        validate(Some("2021-02-30"), today),
        ValidatedDate::Invalid { raw: "2021-02-30".to_string() }
    );
}

#[test]
fn test_parse_query_start_page() {
    let today = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
    let parsed = parse_query(&QueryParams::default(), today);
    assert_eq!(parsed.address, CanonicalAddress::Empty);
    assert_eq!(parsed.date, ValidatedDate::Empty);
}
