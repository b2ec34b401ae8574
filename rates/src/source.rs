//! Rate sources and the HTTP historical-rate implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use spesen_common::{iso_date, Currency};

use crate::error::{RateError, RateResult};

/// Trait for historical FX rate sources.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Source name, for diagnostics.
    fn name(&self) -> &str;

    /// Rate converting one unit of `from` into `to` on `date`.
    async fn historical_rate(
        &self,
        from: Currency,
        to: Currency,
        date: NaiveDate,
    ) -> RateResult<Decimal>;
}

/// Expected response shape: a per-currency rate map keyed by
/// target-currency code. Anything else is treated as failure.
#[derive(Debug, Deserialize)]
struct RateResponse {
    rates: HashMap<String, Decimal>,
}

/// Configuration for [`HistoricalRateSource`].
#[derive(Debug, Clone)]
pub struct RateSourceConfig {
    /// Base URL of the historical-rate endpoint.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for RateSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.frankfurter.app".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP source querying a historical-rate endpoint parameterized by date
/// and currency pair: `GET {base}/{date}?from={FROM}&to={TO}`.
pub struct HistoricalRateSource {
    client: Client,
    config: RateSourceConfig,
}

impl HistoricalRateSource {
    /// Create a new source with the given configuration.
    pub fn new(config: RateSourceConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    fn rate_url(&self, from: Currency, to: Currency, date: NaiveDate) -> String {
        format!(
            "{}/{}?from={}&to={}",
            self.config.base_url.trim_end_matches('/'),
            iso_date(date),
            from,
            to
        )
    }
}

impl Default for HistoricalRateSource {
    fn default() -> Self {
        Self::new(RateSourceConfig::default())
    }
}

#[async_trait]
impl RateSource for HistoricalRateSource {
    fn name(&self) -> &str {
        "historical-http"
    }

    async fn historical_rate(
        &self,
        from: Currency,
        to: Currency,
        date: NaiveDate,
    ) -> RateResult<Decimal> {
        let url = self.rate_url(from, to, date);
        debug!(%url, "fetching historical rate");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::Http(e.to_string()))?;

        let body: RateResponse = response
            .json()
            .await
            .map_err(|e| RateError::MalformedResponse(e.to_string()))?;

        body.rates
            .get(to.code())
            .copied()
            .ok_or(RateError::MissingRate(to))
    }
}

/// Mock rate source for testing.
///
/// Records every lookup so tests can assert how often the source was hit,
/// and can be fed a queue of artificial latencies to stage races between
/// overlapping lookups.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateSource {
    rates: dashmap::DashMap<(Currency, Currency), Decimal>,
    calls: std::sync::atomic::AtomicUsize,
    delays: parking_lot::Mutex<std::collections::VecDeque<Duration>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateSource {
    /// Create an empty mock. Lookups fail with `MissingRate` until a rate
    /// is set.
    pub fn new() -> Self {
        Self {
            rates: dashmap::DashMap::new(),
            calls: std::sync::atomic::AtomicUsize::new(0),
            delays: parking_lot::Mutex::new(std::collections::VecDeque::new()),
        }
    }

    /// Set the rate returned for a currency pair (any date).
    pub fn set_rate(&self, from: Currency, to: Currency, rate: Decimal) {
        self.rates.insert((from, to), rate);
    }

    /// Queue an artificial latency; each lookup pops one entry.
    pub fn push_delay(&self, delay: Duration) {
        self.delays.lock().push_back(delay);
    }

    /// Number of lookups that reached this source.
    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockRateSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateSource for MockRateSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn historical_rate(
        &self,
        from: Currency,
        to: Currency,
        _date: NaiveDate,
    ) -> RateResult<Decimal> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let delay = self.delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.rates
            .get(&(from, to))
            .map(|r| *r)
            .ok_or(RateError::MissingRate(to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_response_shape() {
        let body: RateResponse =
            serde_json::from_str(r#"{"amount":1.0,"base":"USD","date":"2024-03-07","rates":{"EUR":0.9123}}"#)
                .unwrap();
        assert_eq!(body.rates.get("EUR").copied(), Some(dec!(0.9123)));
    }

    #[test]
    fn test_rate_response_rejects_other_shapes() {
        assert!(serde_json::from_str::<RateResponse>(r#"{"error":"not found"}"#).is_err());
        assert!(serde_json::from_str::<RateResponse>("[]").is_err());
    }

    #[test]
    fn test_rate_url() {
        let source = HistoricalRateSource::new(RateSourceConfig {
            base_url: "https://rates.example.com/".to_string(),
            ..RateSourceConfig::default()
        });
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        assert_eq!(
            source.rate_url(Currency::Usd, Currency::Eur, date),
            "https://rates.example.com/2024-03-07?from=USD&to=EUR"
        );
    }

    #[tokio::test]
    async fn test_mock_source_returns_set_rate() {
        let source = MockRateSource::new();
        source.set_rate(Currency::Usd, Currency::Eur, dec!(0.91));

        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let rate = source
            .historical_rate(Currency::Usd, Currency::Eur, date)
            .await
            .unwrap();

        assert_eq!(rate, dec!(0.91));
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_source_missing_rate() {
        let source = MockRateSource::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        let result = source
            .historical_rate(Currency::Chf, Currency::Eur, date)
            .await;

        assert!(matches!(result, Err(RateError::MissingRate(Currency::Eur))));
    }
}
