//! Rate retrieval with the fallback policy.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use spesen_common::Currency;

use crate::source::RateSource;

/// Obtains conversion rates for the line calculator and the aggregator.
///
/// `get_rate` is infallible by contract: a failing source degrades to a
/// rate of 1, so the foreign amount is treated at face value in the target
/// currency instead of blocking the caller. The degradation is silent apart
/// from the diagnostic channel and changes totals without a user-visible
/// warning; the policy is pinned by tests here and in the engine.
#[derive(Clone)]
pub struct RateProvider {
    source: Arc<dyn RateSource>,
}

impl RateProvider {
    /// Create a provider over the given source.
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    /// Rate converting one unit of `from` into `to` on `date`.
    ///
    /// Same-currency lookups return 1 without touching the source. Nothing
    /// is cached; repeated identical lookups re-query.
    pub async fn get_rate(&self, from: Currency, to: Currency, date: NaiveDate) -> Decimal {
        if from == to {
            return Decimal::ONE;
        }

        match self.source.historical_rate(from, to, date).await {
            Ok(rate) => {
                debug!(%from, %to, %date, %rate, "historical rate resolved");
                rate
            }
            Err(error) => {
                warn!(
                    source = self.source.name(),
                    %from,
                    %to,
                    %date,
                    %error,
                    "rate lookup failed, falling back to 1:1"
                );
                Decimal::ONE
            }
        }
    }
}
