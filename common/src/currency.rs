//! The closed currency set for expense reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies an expense line may be denominated in.
///
/// The set is closed: the reporting currency plus the foreign currencies the
/// form offers. Adding a currency means updating [`Currency::ALL`],
/// [`Currency::symbol`] and the submission endpoint's own enumeration in
/// lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    Gbp,
    Nok,
    Chf,
    Dkk,
    Sek,
    Huf,
    Aed,
}

impl Currency {
    /// The currency all totals are reported in.
    pub const REPORTING: Currency = Currency::Eur;

    /// Every supported currency, reporting currency first (display order).
    pub const ALL: [Currency; 9] = [
        Currency::Eur,
        Currency::Usd,
        Currency::Gbp,
        Currency::Nok,
        Currency::Chf,
        Currency::Dkk,
        Currency::Sek,
        Currency::Huf,
        Currency::Aed,
    ];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Nok => "NOK",
            Currency::Chf => "CHF",
            Currency::Dkk => "DKK",
            Currency::Sek => "SEK",
            Currency::Huf => "HUF",
            Currency::Aed => "AED",
        }
    }

    /// Display symbol shown next to amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
            Currency::Nok => "kr",
            Currency::Chf => "Fr.",
            Currency::Dkk => "kr",
            Currency::Sek => "kr",
            Currency::Huf => "Ft",
            Currency::Aed => "د.إ",
        }
    }

    /// Look up a currency by its code. Unknown codes yield `None`; the set
    /// is closed and callers must not invent members.
    pub fn from_code(code: &str) -> Option<Currency> {
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Whether this is the reporting currency.
    pub fn is_reporting(&self) -> bool {
        *self == Currency::REPORTING
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_roundtrip() {
        for currency in Currency::ALL {
            assert_eq!(Currency::from_code(currency.code()), Some(currency));
        }
    }

    #[test]
    fn test_from_code_is_case_insensitive() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::Usd));
        assert_eq!(Currency::from_code(" chf "), Some(Currency::Chf));
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        assert_eq!(Currency::from_code("JPY"), None);
        assert_eq!(Currency::from_code(""), None);
    }

    #[test]
    fn test_reporting_currency() {
        assert!(Currency::Eur.is_reporting());
        assert!(!Currency::Usd.is_reporting());
        assert_eq!(Currency::ALL[0], Currency::REPORTING);
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Currency::Nok.to_string(), "NOK");
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Currency::Eur.symbol(), "€");
        assert_eq!(Currency::Gbp.symbol(), "£");
        assert_eq!(Currency::Huf.symbol(), "Ft");
    }
}
