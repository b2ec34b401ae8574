//! Time helpers for report drafts.

use chrono::{NaiveDate, Utc};

/// Today's calendar date (UTC), the default transaction date for a line
/// that has none at computation time.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// ISO `YYYY-MM-DD`, the wire format for dates.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
