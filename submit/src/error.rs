//! Submission error types.

use thiserror::Error;

/// A validation failure: the first failing check, carrying its user-facing
/// message. Submission is aborted and the draft is left untouched for
/// correction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Transport-level submission failures.
///
/// The caller may resubmit after any of these; nothing is retried
/// automatically and there is no partial per-line retry.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A line's receipt could not be encoded into the upload form.
    #[error("invalid payload part: {0}")]
    InvalidPayload(String),

    /// The HTTP request failed.
    #[error("submission request failed: {0}")]
    Transport(String),

    /// The response was not the expected JSON shape.
    #[error("malformed submission response: {0}")]
    MalformedResponse(String),
}
