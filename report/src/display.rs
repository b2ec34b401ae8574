//! Rendering and parsing of the per-line conversion display.
//!
//! The calculation statement's trailing numeric token before the
//! reporting-currency label is re-parsed at submission time, so the render
//! format here is a contract, not cosmetics. Render and parse live in the
//! same module so they cannot drift apart; the round-trip test pins them.

use rust_decimal::Decimal;

use spesen_common::{format_amount, format_rate, Currency};

/// The two statements rendered into a line's conversion panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionDisplay {
    /// Rate statement, e.g. `Historic rate: 1 USD = 0.9123 EUR`.
    pub rate_text: String,
    /// Calculation statement, e.g. `100 × 0.9123 = 91.23 EUR`.
    pub calculation_text: String,
}

impl ConversionDisplay {
    /// Render the display for a foreign-currency amount at a resolved rate.
    ///
    /// The rate carries exactly four fractional digits, the converted
    /// amount exactly two; the amount itself is shown with trailing zeros
    /// stripped.
    pub fn render(amount: Decimal, currency: Currency, rate: Decimal) -> Self {
        let reporting = Currency::REPORTING.code();
        let rate_4dp = format_rate(rate);
        let converted = format_amount(amount * rate);

        Self {
            rate_text: format!("Historic rate: 1 {currency} = {rate_4dp} {reporting}"),
            calculation_text: format!(
                "{} × {rate_4dp} = {converted} {reporting}",
                amount.normalize()
            ),
        }
    }

    /// The converted amount encoded in the calculation statement.
    pub fn converted_amount(&self) -> Option<Decimal> {
        parse_converted_amount(&self.calculation_text)
    }
}

/// Extract the trailing numeric token before the reporting-currency label
/// of a calculation statement.
///
/// Accepts exactly the shape [`ConversionDisplay::render`] produces:
/// `... = <digits[.digits]> EUR`. Anything else yields `None`.
pub fn parse_converted_amount(calculation_text: &str) -> Option<Decimal> {
    let rest = calculation_text
        .trim_end()
        .strip_suffix(Currency::REPORTING.code())?
        .trim_end();

    let (prefix, token) = rest.rsplit_once(' ')?;
    if !prefix.trim_end().ends_with('=') {
        return None;
    }
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spesen_common::round_amount;

    #[test]
    fn test_render_formats() {
        let display = ConversionDisplay::render(dec!(100), Currency::Usd, dec!(0.9123));

        assert_eq!(display.rate_text, "Historic rate: 1 USD = 0.9123 EUR");
        assert_eq!(display.calculation_text, "100 × 0.9123 = 91.23 EUR");
    }

    #[test]
    fn test_render_strips_trailing_zeros_from_amount() {
        let display = ConversionDisplay::render(dec!(50.00), Currency::Gbp, dec!(1.1700));

        assert_eq!(display.calculation_text, "50 × 1.1700 = 58.50 EUR");
    }

    #[test]
    fn test_parse_extracts_trailing_token() {
        assert_eq!(
            parse_converted_amount("100 × 0.9123 = 91.23 EUR"),
            Some(dec!(91.23))
        );
    }

    #[test]
    fn test_parse_rejects_other_text() {
        assert_eq!(parse_converted_amount(""), None);
        assert_eq!(parse_converted_amount("91.23 EUR"), None);
        assert_eq!(parse_converted_amount("100 × 0.9123 = 91.23 USD"), None);
        assert_eq!(parse_converted_amount("= abc EUR"), None);
    }

    #[test]
    fn test_round_trip_equals_rounded_product() {
        let cases = [
            (dec!(50), dec!(0.90)),
            (dec!(12.34), dec!(0.9123)),
            (dec!(0.01), dec!(11.4233)),
            (dec!(999.99), dec!(1.0)),
        ];

        for (amount, rate) in cases {
            let display = ConversionDisplay::render(amount, Currency::Usd, rate);
            let parsed = display.converted_amount().unwrap();
            assert_eq!(parsed, round_amount(amount * rate));
        }
    }
}
