//! Expense line records.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use spesen_common::{today, Currency, LineId};

use crate::display::ConversionDisplay;

/// A receipt file owned by its expense line.
///
/// Ownership lives on the line record itself. When the line is removed the
/// attachment is dropped with it, and the line's id can no longer resolve
/// to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name.
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Create a new attachment.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// A single line of an expense report draft.
#[derive(Debug, Clone)]
pub struct ExpenseLine {
    /// Stable identifier, assigned at creation.
    pub id: LineId,
    /// Transaction date; `None` resolves to today at computation time.
    pub date: Option<NaiveDate>,
    /// Free-text description, required at submission.
    pub description: String,
    /// Sanitized non-negative amount, at most two fractional digits.
    pub amount: Decimal,
    /// Currency the amount is denominated in.
    pub currency: Currency,
    /// Receipt file, owned by this line.
    pub attachment: Option<Attachment>,
    /// Last-rendered conversion; always `None` for reporting-currency
    /// lines and zero amounts.
    pub conversion: Option<ConversionDisplay>,
    /// Bumped on every mutation of a calculation input (amount, currency,
    /// date). A lookup result carrying an older revision is discarded on
    /// arrival instead of applied.
    pub revision: u64,
}

impl ExpenseLine {
    /// Create an empty line in the reporting currency.
    pub fn new() -> Self {
        Self {
            id: LineId::new(),
            date: None,
            description: String::new(),
            amount: Decimal::ZERO,
            currency: Currency::REPORTING,
            attachment: None,
            conversion: None,
            revision: 0,
        }
    }

    /// Date used for rate lookups: the explicit value, or today.
    pub fn effective_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(today)
    }

    /// Whether the line contributes to the total.
    pub fn has_amount(&self) -> bool {
        !self.amount.is_zero()
    }
}

impl Default for ExpenseLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_line_is_empty_reporting_line() {
        let line = ExpenseLine::new();

        assert_eq!(line.currency, Currency::REPORTING);
        assert_eq!(line.amount, Decimal::ZERO);
        assert!(!line.has_amount());
        assert!(line.conversion.is_none());
        assert!(line.attachment.is_none());
    }

    #[test]
    fn test_effective_date_prefers_explicit_value() {
        let mut line = ExpenseLine::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        line.date = Some(date);

        assert_eq!(line.effective_date(), date);
    }

    #[test]
    fn test_effective_date_defaults_to_today() {
        let line = ExpenseLine::new();
        assert_eq!(line.effective_date(), today());
    }

    #[test]
    fn test_has_amount() {
        let mut line = ExpenseLine::new();
        assert!(!line.has_amount());

        line.amount = dec!(0.01);
        assert!(line.has_amount());
    }
}
