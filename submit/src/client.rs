//! Submission transport client.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SubmitError;
use crate::form::ExpenseCategory;
use crate::payload::SubmissionPayload;

/// Configuration for [`SubmitClient`].
#[derive(Debug, Clone)]
pub struct SubmitClientConfig {
    /// Absolute URL of the submission endpoint.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for SubmitClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/submit_expense".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Expected response shape from the submission endpoint.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    success: bool,
    #[serde(default)]
    redirect: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Outcome of a submission attempt that reached the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted; the caller should navigate to the given target.
    Accepted { redirect: String },
    /// Rejected with a user-facing message; the caller may correct the
    /// draft and resubmit.
    Rejected { error: String },
}

/// Client for the report submission endpoint.
pub struct SubmitClient {
    client: Client,
    config: SubmitClientConfig,
}

impl SubmitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SubmitClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// POST the payload as a multipart form.
    ///
    /// Transport and decode failures are returned as errors; the payload
    /// can be rebuilt and the submission repeated. Nothing is retried
    /// automatically.
    pub async fn submit(&self, payload: SubmissionPayload) -> Result<SubmitOutcome, SubmitError> {
        let line_count = payload.lines.len();
        let form = build_form(payload)?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;

        if body.success {
            let redirect = body.redirect.unwrap_or_else(|| "/".to_string());
            debug!(lines = line_count, %redirect, "report submitted");
            Ok(SubmitOutcome::Accepted { redirect })
        } else {
            let error = body
                .error
                .unwrap_or_else(|| "submission rejected".to_string());
            warn!(lines = line_count, %error, "report rejected by endpoint");
            Ok(SubmitOutcome::Rejected { error })
        }
    }
}

impl Default for SubmitClient {
    fn default() -> Self {
        Self::new(SubmitClientConfig::default())
    }
}

/// Lay the payload out as the endpoint expects it: report-level fields
/// first, then one repetition of each `[]` key per line.
fn build_form(payload: SubmissionPayload) -> Result<Form, SubmitError> {
    let mut form = Form::new().text("expense-type", payload.form.category.as_str());

    match payload.form.category {
        ExpenseCategory::Other => {
            if let Some(comment) = payload.form.comment {
                form = form.text("comment", comment);
            }
        }
        ExpenseCategory::Travel => {
            if let Some(travel) = payload.form.travel {
                form = form
                    .text("purpose", travel.purpose)
                    .text("from", travel.from)
                    .text("to", travel.to)
                    .text("departure", travel.departure)
                    .text("return", travel.return_date);
            }
        }
    }

    for line in payload.lines {
        form = form
            .text("date[]", line.date)
            .text("description[]", line.description)
            .text("amount[]", line.amount)
            .text("currency[]", line.currency)
            .text("original_amount[]", line.original_amount);

        if let Some(receipt) = line.receipt {
            let part = Part::bytes(receipt.bytes)
                .file_name(receipt.file_name)
                .mime_str(&receipt.content_type)
                .map_err(|e| SubmitError::InvalidPayload(e.to_string()))?;
            form = form.part("receipt[]", part);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ReportForm;
    use crate::payload::PayloadLine;
    use spesen_report::Attachment;

    fn payload_with_receipt(content_type: &str) -> SubmissionPayload {
        SubmissionPayload {
            form: ReportForm::other("team dinner"),
            lines: vec![PayloadLine {
                date: "2024-03-07".to_string(),
                description: "dinner".to_string(),
                amount: "45.62".to_string(),
                currency: "USD".to_string(),
                original_amount: "50.00".to_string(),
                receipt: Some(Attachment::new("r.pdf", content_type, vec![1, 2])),
            }],
        }
    }

    #[test]
    fn test_submit_response_accepted_shape() {
        let body: SubmitResponse =
            serde_json::from_str(r#"{"success":true,"redirect":"/dashboard"}"#).unwrap();
        assert!(body.success);
        assert_eq!(body.redirect.as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_submit_response_rejected_shape() {
        let body: SubmitResponse =
            serde_json::from_str(r#"{"success":false,"error":"missing receipt"}"#).unwrap();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("missing receipt"));
    }

    #[test]
    fn test_build_form_accepts_valid_payload() {
        assert!(build_form(payload_with_receipt("application/pdf")).is_ok());
    }

    #[test]
    fn test_build_form_rejects_invalid_content_type() {
        let result = build_form(payload_with_receipt("not a mime type"));
        assert!(matches!(result, Err(SubmitError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_transport_error() {
        let client = SubmitClient::new(SubmitClientConfig {
            endpoint: "http://127.0.0.1:9/submit_expense".to_string(),
            timeout: Duration::from_millis(500),
        });

        let result = client.submit(payload_with_receipt("application/pdf")).await;
        assert!(matches!(result, Err(SubmitError::Transport(_))));
    }
}
