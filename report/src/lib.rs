//! Spesen Report Engine
//!
//! The multi-currency aggregation engine behind an expense report draft:
//! an ordered store of expense lines, a per-line calculator that renders a
//! conversion display, and an aggregator producing the reporting-currency
//! total.
//!
//! [`ReportEngine`] ties the pieces together. Its typed mutators are the
//! only write path that keeps a draft consistent: every mutation of a
//! calculation input (amount, currency, date) re-runs the line calculator
//! for that line and then the aggregator over the full store. Per-line
//! revision tokens discard lookup results that were superseded by a later
//! edit before they resolved.

pub mod display;
pub mod engine;
pub mod line;
pub mod store;

pub use display::{parse_converted_amount, ConversionDisplay};
pub use engine::ReportEngine;
pub use line::{Attachment, ExpenseLine};
pub use store::{LineSnapshot, LineStore};
