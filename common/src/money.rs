//! Amount sanitization and monetary formatting.
//!
//! Every amount entering the engine passes through [`sanitize_amount`]
//! before it is stored or used in a computation. Formatting helpers pin the
//! decimal scales the rendered displays and the submission payload agree on.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits amounts carry at rest and in totals.
pub const AMOUNT_SCALE: u32 = 2;

/// Fractional digits a displayed rate carries.
pub const RATE_SCALE: u32 = 4;

/// Coerce raw field input into a valid amount.
///
/// Non-numeric input becomes zero, a leading numeric prefix is honored when
/// the full string does not parse, the sign is stripped, and the result is
/// rounded to [`AMOUNT_SCALE`] digits half away from zero. The returned
/// value is always finite and non-negative.
pub fn sanitize_amount(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    let parsed = trimmed
        .parse::<Decimal>()
        .ok()
        .or_else(|| numeric_prefix(trimmed).and_then(|p| p.parse().ok()))
        .unwrap_or(Decimal::ZERO);
    round_amount(parsed.abs())
}

/// Longest leading substring that looks like a signed decimal number.
fn numeric_prefix(s: &str) -> Option<&str> {
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => seen_digit = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    let prefix = &s[..end];
    Some(prefix.strip_suffix('.').unwrap_or(prefix))
}

/// Round a value to the at-rest amount scale, half away from zero.
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Render a value with exactly two fractional digits.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_amount(value))
}

/// Render a rate with exactly four fractional digits.
pub fn format_rate(rate: Decimal) -> String {
    let rounded = rate.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.4}")
}
