use std::{collections::HashSet, str::FromStr};

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

const NUMBER_ESCAPE_CHAR: &[char] = &[',', ' ', '"', '\n', '\r', '\t'];

/// Parses a `Decimal` value from a given string.
///
/// Thousands separators and surrounding whitespace are removed before
/// parsing, together with any additional `escape_chars`.
///
/// # Arguments
///
/// * `s`: A string slice containing the representation of a decimal number.
/// * `escape_chars`: A list of additional characters to be removed from the
///                   string before parsing.
///
/// # Returns
///
/// * `Result<Decimal>`: The parsed `Decimal` value if successful, or an error
///                      if the conversion fails.
///
/// # Example
///
/// ```
/// let s = "1,234.56";
/// let decimal_value = parse_decimal(s, None).unwrap();
/// ```
pub fn parse_decimal(s: &str, escape_chars: Option<Vec<char>>) -> Result<Decimal> {
    let cleaned = clean_escape_chars(s, escape_chars);
    Decimal::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as Decimal because {:?}", cleaned, why))
}

/// Parses a `u64` value from a given string, see [`parse_decimal`].
pub fn parse_u64(s: &str, escape_chars: Option<Vec<char>>) -> Result<u64> {
    let cleaned = clean_escape_chars(s, escape_chars);
    u64::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as u64 because {:?}", cleaned, why))
}

/// Removes the number escape characters and the given `escape_chars` from `s`.
pub(crate) fn clean_escape_chars(s: &str, escape_chars: Option<Vec<char>>) -> String {
    let mut combined: Vec<char> = NUMBER_ESCAPE_CHAR.to_vec();
    if let Some(ec) = escape_chars {
        combined.extend(ec);
    }

    let filters = combined.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}
