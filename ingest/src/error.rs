//! Ingestion error types.

use thiserror::Error;

/// Errors from the receipt-recognition round trip.
///
/// All of them are absorbed by the ingestion path: the target line's
/// fields stay unchanged and the failure is reported on the diagnostic
/// channel only.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The HTTP request failed.
    #[error("recognition request failed: {0}")]
    Http(String),

    /// The response body was not JSON.
    #[error("malformed recognition response: {0}")]
    MalformedResponse(String),

    /// The file could not be encoded into the upload form.
    #[error("invalid upload part: {0}")]
    InvalidUpload(String),
}

/// Result type for recognition operations.
pub type OcrResult<T> = Result<T, OcrError>;
