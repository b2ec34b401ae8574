//! Receipt recognition client and field application.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use spesen_common::{format_amount, Currency, LineId};
use spesen_report::ReportEngine;

use crate::error::{OcrError, OcrResult};

/// Fields a receipt scan can populate. A missing field is simply not
/// applied to the line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcrFields {
    /// Transaction date printed on the receipt.
    pub date: Option<NaiveDate>,
    /// Receipt total.
    pub total: Option<Decimal>,
    /// Currency code, if it maps into the supported set.
    pub currency: Option<Currency>,
}

impl OcrFields {
    /// Whether the scan recognized anything at all.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.total.is_none() && self.currency.is_none()
    }
}

/// Configuration for [`OcrClient`].
#[derive(Debug, Clone)]
pub struct OcrClientConfig {
    /// Absolute URL of the recognition endpoint.
    pub endpoint: String,
    /// Request timeout; recognition is slow compared to rate lookups.
    pub timeout: Duration,
}

impl Default for OcrClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000/process_receipt".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the external receipt-recognition service.
pub struct OcrClient {
    client: Client,
    config: OcrClientConfig,
}

impl OcrClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OcrClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// Submit one receipt file for recognition.
    ///
    /// The response either wraps the recognized fields under a `results`
    /// key or is the result object itself; both shapes are accepted.
    pub async fn scan(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> OcrResult<OcrFields> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| OcrError::InvalidUpload(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| OcrError::Http(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| OcrError::MalformedResponse(e.to_string()))?;

        let fields = extract_fields(&body);
        debug!(file = %file_name, ?fields, "receipt recognized");
        Ok(fields)
    }
}

impl Default for OcrClient {
    fn default() -> Self {
        Self::new(OcrClientConfig::default())
    }
}

/// Pull recognized fields out of a response body.
fn extract_fields(body: &Value) -> OcrFields {
    let results = body.get("results").unwrap_or(body);

    OcrFields {
        date: results
            .get("date")
            .and_then(Value::as_str)
            .and_then(parse_receipt_date),
        total: results.get("total").and_then(value_as_decimal),
        currency: results
            .get("currency")
            .and_then(Value::as_str)
            .and_then(Currency::from_code),
    }
}

fn value_as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

/// Normalize a recognized date.
///
/// Accepts ISO `YYYY-MM-DD` plus the `DD/MM/YYYY` and `DD.MM.YYYY` shapes
/// receipts commonly carry; two-digit years are treated as 20xx.
pub fn parse_receipt_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    let parts: Vec<&str> = raw.split(['/', '.']).collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    let year = if parts[2].len() == 2 { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Write recognized fields into a line through the engine's injection
/// points, in the same order a manual fill would touch them: date, then
/// amount (pre-formatted to two decimals), then currency. Each write
/// re-runs the line calculator and the aggregator.
pub async fn apply_ocr(engine: &ReportEngine, id: LineId, fields: OcrFields) {
    if let Some(date) = fields.date {
        engine.set_date(id, Some(date)).await;
    }
    if let Some(total) = fields.total {
        engine.set_amount(id, &format_amount(total)).await;
    }
    if let Some(currency) = fields.currency {
        engine.set_currency(id, currency).await;
    }
}
