//! Spesen Submission
//!
//! Turns a report draft into a transport payload and ships it. The
//! reporting-currency amount of each foreign line is re-derived from the
//! line's rendered calculation statement rather than recomputed from a
//! stored number, so what the endpoint receives is exactly what the
//! display showed. Validation is fail-fast and leaves the draft untouched;
//! a failed transport attempt can simply be resubmitted.

pub mod client;
pub mod error;
pub mod form;
pub mod payload;

pub use client::{SubmitClient, SubmitClientConfig, SubmitOutcome};
pub use error::{SubmitError, ValidationError};
pub use form::{ExpenseCategory, ReportForm, TravelDetails};
pub use payload::{assemble, PayloadLine, SubmissionPayload};
