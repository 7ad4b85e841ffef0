//! Address canonicalization for the `ip` parameter.
//!
//! Accepts dotted-decimal IPv4 and IPv6 in compressed or expanded
//! notation, optionally wrapped in brackets. IPv6 input is handled in
//! explicit steps:
//!
//! ```text
//! "[2001:db8::1]" → strip brackets → split fields → validate fields → expand gap
//!                    "2001:db8::1"   [2001,db8,_,1]   [0x2001,0xdb8,gap,1]   8 groups
//! ```

use exonerator_core::{CanonicalAddress, IpAddress};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Four dot-separated groups of one to three decimal digits
    static ref IPV4_PATTERN: Regex =
        Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$").unwrap();

    /// Hex digits and colons, optionally in brackets
    static ref IPV6_PATTERN: Regex = Regex::new(r"^\[?[0-9a-fA-F:]{3,39}\]?$").unwrap();
}

const IPV6_GROUPS: usize = 8;
const MAX_FIELD_LEN: usize = 4;

/// Canonicalize a raw `ip` parameter.
///
/// An absent or empty parameter is [`CanonicalAddress::Empty`]; anything
/// that does not parse is [`CanonicalAddress::Invalid`] carrying the
/// parameter unchanged.
pub fn canonicalize(raw: Option<&str>) -> CanonicalAddress {
    let raw = match raw {
        None | Some("") => return CanonicalAddress::Empty,
        Some(raw) => raw,
    };

    match parse_address(raw.trim()) {
        Some(address) => CanonicalAddress::Valid(address),
        None => CanonicalAddress::Invalid {
            raw: raw.to_string(),
        },
    }
}

fn parse_address(input: &str) -> Option<IpAddress> {
    if let Some(captures) = IPV4_PATTERN.captures(input) {
        let mut octets = [0u8; 4];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = captures.get(i + 1)?.as_str().parse().ok()?;
        }
        return Some(IpAddress::from_octets(octets));
    }

    if IPV6_PATTERN.is_match(input) {
        return parse_ipv6(input);
    }

    None
}

/// A colon-separated IPv6 field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// The `::` compression point
    Gap,
    Group(u16),
}

fn parse_ipv6(input: &str) -> Option<IpAddress> {
    let body = strip_brackets(input)?;
    let fields = split_fields(body)?;
    let groups = expand_gap(&fields)?;
    Some(IpAddress::from_groups(groups))
}

/// Remove a balanced pair of surrounding brackets
fn strip_brackets(input: &str) -> Option<&str> {
    match (input.strip_prefix('['), input.ends_with(']')) {
        (Some(inner), true) => inner.strip_suffix(']'),
        (None, false) => Some(input),
        _ => None,
    }
}

/// Split into fields, keeping empty ones. A leading or trailing `::`
/// contributes a single gap, not two empty fields; a single leading or
/// trailing `:` is a gap of its own.
fn split_fields(body: &str) -> Option<Vec<Field>> {
    let mut inner = body;
    if inner.starts_with("::") {
        inner = &inner[1..];
    }
    if inner.ends_with("::") {
        inner = &inner[..inner.len() - 1];
    }

    inner.split(':').map(parse_field).collect()
}

fn parse_field(field: &str) -> Option<Field> {
    if field.is_empty() {
        return Some(Field::Gap);
    }
    if field.len() > MAX_FIELD_LEN || !field.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(field, 16).ok().map(Field::Group)
}

/// Replace the gap, if any, with as many zero groups as needed to
/// reach eight groups.
fn expand_gap(fields: &[Field]) -> Option<[u16; IPV6_GROUPS]> {
    let gaps = fields.iter().filter(|f| **f == Field::Gap).count();
    let explicit = fields.len() - gaps;

    let fill = match gaps {
        0 if explicit == IPV6_GROUPS => 0,
        1 if explicit < IPV6_GROUPS => IPV6_GROUPS - explicit,
        _ => return None,
    };

    let mut groups = [0u16; IPV6_GROUPS];
    let mut next = 0;
    for field in fields {
        match field {
            Field::Group(value) => {
                groups[next] = *value;
                next += 1;
            }
            Field::Gap => next += fill,
        }
    }
    Some(groups)
}
