//! Value normalization shared by the resolvers and by dataset ingestion.
//!
//! Source cells and caller filters both arrive with padding, non-breaking
//! spaces and placeholder values. Everything goes through these helpers so
//! that a missing value has exactly one representation: `None`.

use std::cmp::Ordering;

use rust_decimal::Decimal;

/// Placeholder the statistical export writes for an empty cell.
pub const MISSING_PLACEHOLDER: &str = ".";

const NON_BREAKING_SPACE: char = '\u{a0}';

/// Normalizes a raw textual value.
///
/// Non-breaking spaces become regular spaces and surrounding whitespace is
/// removed. The empty string and the `"."` placeholder are missing.
///
/// # Examples
///
/// ```
/// use alicuota_core::resolvers::common::clean_text;
///
/// assert_eq!(clean_text("\u{a0}Comercio "), Some("Comercio".to_string()));
/// assert_eq!(clean_text("."), None);
/// assert_eq!(clean_text("   "), None);
/// ```
pub fn clean_text(raw: &str) -> Option<String> {
    let replaced = raw.replace(NON_BREAKING_SPACE, " ");
    let trimmed = replaced.trim();

    if trimmed.is_empty() || trimmed == MISSING_PLACEHOLDER {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Drops a trailing `".0"` left behind when integers were serialized as floats.
pub fn strip_float_suffix(value: &str) -> &str {
    value.strip_suffix(".0").unwrap_or(value)
}

/// Parses a year given as text, tolerating padding and a trailing `".0"`.
///
/// Returns `None` for missing or non-integer input.
pub fn parse_year(raw: &str) -> Option<i32> {
    let cleaned = clean_text(raw)?;
    strip_float_suffix(&cleaned).parse().ok()
}

/// Renders a decimal the way option lists and filters compare it.
pub fn decimal_text(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use alicuota_core::resolvers::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(3.454)), dec!(3.45));
/// assert_eq!(round_half_up(dec!(3.455)), dec!(3.46));
/// assert_eq!(round_half_up(dec!(-3.455)), dec!(-3.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Total order used for every option list.
///
/// All-digit tokens compare by integer value and sort before textual tokens;
/// textual tokens compare lexicographically. Equal integers with different
/// spellings (`"07"`, `"7"`) fall back to the lexicographic order.
pub fn compare_options(
    a: &str,
    b: &str,
) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn numeric_key(value: &str) -> Option<u128> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse().ok()
    } else {
        None
    }
}
