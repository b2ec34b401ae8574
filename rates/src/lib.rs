//! Spesen Rate Retrieval
//!
//! Historical FX rates for expense-line conversion, in two layers:
//!
//! - [`RateSource`] is where rates come from. The HTTP implementation
//!   queries a historical-rate endpoint keyed by date and currency pair,
//!   and can fail.
//! - [`RateProvider`] is what the rest of the engine calls. It never fails:
//!   same-currency lookups short-circuit to 1 without touching the source,
//!   and any source failure degrades to a 1:1 fallback rate.
//!
//! Nothing is cached; repeated identical lookups re-query the source.

pub mod error;
pub mod provider;
pub mod source;

pub use error::{RateError, RateResult};
pub use provider::RateProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use source::MockRateSource;
pub use source::{HistoricalRateSource, RateSource, RateSourceConfig};
