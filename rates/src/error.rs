//! Rate lookup error types.

use spesen_common::Currency;
use thiserror::Error;

/// Errors a rate source can produce.
///
/// The provider facade absorbs all of these into the fallback rate; they
/// surface only on the diagnostic channel.
#[derive(Debug, Error)]
pub enum RateError {
    /// The HTTP request itself failed.
    #[error("rate request failed: {0}")]
    Http(String),

    /// The response body was not the expected shape.
    #[error("malformed rate response: {0}")]
    MalformedResponse(String),

    /// The response parsed but carried no rate for the requested currency.
    #[error("no rate for {0} in response")]
    MissingRate(Currency),
}

/// Result type for rate source operations.
pub type RateResult<T> = Result<T, RateError>;
