//! Length capping of echoed user input

/// Marker appended to truncated echoes
pub const ELLIPSIS: &str = "[...]";

/// Longest invalid address echoed back verbatim
pub const MAX_ADDRESS_ECHO: usize = 40;

/// Longest invalid date echoed back verbatim
pub const MAX_DATE_ECHO: usize = 20;

/// Keep at most `max_chars` characters of `raw`, appending [`ELLIPSIS`]
/// if anything was cut.
pub fn truncate_echo(raw: &str, max_chars: usize) -> String {
    match raw.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}{}", &raw[..end], ELLIPSIS),
        None => raw.to_string(),
    }
}
