//! Key and XML name helpers
//!
//! Object keys are not XML names: they may be array indices, carry an attribute
//! marker, or contain characters XML forbids. These helpers classify keys before
//! they become tags or attribute names.

use once_cell::sync::Lazy;
use regex::Regex;

// XML Name pattern (simplified, ASCII plus the Latin-1/Greek letter ranges)
static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}:]*$",
    )
    .unwrap()
});

/// Check if a string is a valid XML Name
pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name)
}

// Number literal forms accepted for keys: signed decimals with optional exponent,
// signed Infinity, and unsigned hex/octal/binary integers
static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)|0[xX][0-9a-fA-F]+|0[oO][0-7]+|0[bB][01]+)$",
    )
    .unwrap()
});

/// Check whether a key reads as a number, the way array indices do
///
/// Surrounding whitespace is ignored and an empty key counts as numeric. Overflowing
/// literals such as `1e400` and the spelled-out `Infinity` are numbers too; only
/// keys that are not a number literal at all (including `NaN`) are rejected.
pub fn is_numeric_key(key: &str) -> bool {
    let trimmed = key.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    trimmed.is_empty() || NUMBER.is_match(trimmed)
}

/// Check whether `key` starts with the attribute marker character
pub fn has_attribute_marker(key: &str, marker: char) -> bool {
    key.starts_with(marker)
}

/// Drop the first character of a key
pub fn strip_first_char(key: &str) -> &str {
    let mut chars = key.chars();
    chars.next();
    chars.as_str()
}
