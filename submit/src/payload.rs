//! Assembling the transport payload from the line set.

use rust_decimal::Decimal;

use spesen_common::{format_amount, iso_date, round_amount};
use spesen_report::{Attachment, ExpenseLine};

use crate::error::ValidationError;
use crate::form::{ExpenseCategory, ReportForm};

/// One line of the transport payload. All monetary fields are already in
/// their two-decimal wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadLine {
    /// ISO transaction date.
    pub date: String,
    pub description: String,
    /// Reporting-currency amount.
    pub amount: String,
    /// Original currency code.
    pub currency: String,
    /// Amount in the original currency.
    pub original_amount: String,
    pub receipt: Option<Attachment>,
}

/// The assembled payload, ready for transport.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub form: ReportForm,
    pub lines: Vec<PayloadLine>,
}

/// Walk the line set and build the transport payload.
///
/// Validation is fail-fast: the first failing check aborts with its
/// user-facing message and nothing is packaged. The reporting-currency
/// amount of a foreign line is re-derived from the line's rendered
/// calculation statement, not recomputed from a stored number.
pub fn assemble(
    lines: &[ExpenseLine],
    form: &ReportForm,
) -> Result<SubmissionPayload, ValidationError> {
    if lines.is_empty() {
        return Err(ValidationError(
            "Please add at least one expense line".to_string(),
        ));
    }

    for (index, line) in lines.iter().enumerate() {
        if line.date.is_none() || line.description.trim().is_empty() || !line.has_amount() {
            return Err(ValidationError(format!(
                "Please fill all required fields in expense line {}",
                index + 1
            )));
        }
    }

    match form.category {
        ExpenseCategory::Other => {
            let comment = form.comment.as_deref().unwrap_or("");
            if comment.trim().is_empty() {
                return Err(ValidationError(
                    "Please add a comment for other expenses".to_string(),
                ));
            }
        }
        ExpenseCategory::Travel => {
            if !form.travel.as_ref().is_some_and(|t| t.is_complete()) {
                return Err(ValidationError(
                    "Please fill all travel details".to_string(),
                ));
            }
        }
    }

    Ok(SubmissionPayload {
        form: form.clone(),
        lines: lines.iter().map(payload_line).collect(),
    })
}

/// Reporting-currency amount for one line: the face value for
/// reporting-currency lines, otherwise the trailing token of the rendered
/// calculation statement. An absent or unparseable display falls back to
/// the face value, matching the provider's 1:1 degradation.
fn reporting_amount(line: &ExpenseLine) -> Decimal {
    if line.currency.is_reporting() {
        return round_amount(line.amount);
    }

    line.conversion
        .as_ref()
        .and_then(|conversion| conversion.converted_amount())
        .unwrap_or_else(|| round_amount(line.amount))
}

fn payload_line(line: &ExpenseLine) -> PayloadLine {
    PayloadLine {
        date: line.date.map(iso_date).unwrap_or_default(),
        description: line.description.clone(),
        amount: format_amount(reporting_amount(line)),
        currency: line.currency.code().to_string(),
        original_amount: format_amount(line.amount),
        receipt: line.attachment.clone(),
    }
}
