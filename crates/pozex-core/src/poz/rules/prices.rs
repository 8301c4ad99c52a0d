//! Price token recognition and Turkish-locale numeric normalization.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::THOUSANDS_ONLY;

/// Strip a raw token down to price-relevant characters (digits, periods,
/// commas). OCR routinely glues currency marks and stray punctuation onto
/// price tokens.
pub fn strip_numeric(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect()
}

/// Normalize a Turkish-formatted numeric string to a canonical decimal.
///
/// Turkish price lists use the period as thousands separator and the comma
/// as decimal separator. Disambiguation:
/// - a comma is present: periods are thousands separators, the comma is the
///   decimal point (`1.234,50` -> 1234.50);
/// - periods only, in thousands-group shape: separators (`1.250.000` ->
///   1250000);
/// - otherwise the token is already canonical (`1234.50` -> 1234.50).
pub fn normalize_decimal(stripped: &str) -> Option<Decimal> {
    if !stripped.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let canonical = if stripped.contains(',') {
        stripped.replace('.', "").replace(',', ".")
    } else if THOUSANDS_ONLY.is_match(stripped) {
        stripped.replace('.', "")
    } else {
        stripped.to_string()
    };

    Decimal::from_str(&canonical).ok()
}

/// Reverse-scan `tokens` for the rightmost price-like token.
///
/// The matched token is removed from the sequence and the scan stops; only
/// one price is ever taken from a line. Tokens that fail to normalize are
/// skipped, not fatal. Under `require_positive`, tokens that normalize to
/// zero do not qualify and the scan continues leftward.
pub fn take_price(tokens: &mut Vec<String>, require_positive: bool) -> Option<Decimal> {
    for idx in (0..tokens.len()).rev() {
        let stripped = strip_numeric(&tokens[idx]);
        let Some(value) = normalize_decimal(&stripped) else {
            continue;
        };
        if require_positive && value.is_zero() {
            continue;
        }
        tokens.remove(idx);
        return Some(value);
    }
    None
}
