//! The report engine: calculator, aggregator, and the typed write path.

use chrono::NaiveDate;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::debug;

use spesen_common::{round_amount, sanitize_amount, today, Currency, LineId};
use spesen_rates::RateProvider;

use crate::display::ConversionDisplay;
use crate::line::Attachment;
use crate::store::LineStore;

/// Drives a report draft: owns the line store, resolves rates through the
/// provider, and keeps the per-line conversion displays and the shared
/// total display consistent with the current line set.
///
/// The mutators here are the injection points for every populate mechanism:
/// manual edits, receipt recognition and drop ingestion all write through
/// the same three calls (`set_date`, `set_amount`, `set_currency`), each of
/// which re-runs the line calculator and then the aggregator.
pub struct ReportEngine {
    store: LineStore,
    rates: RateProvider,
    total: RwLock<String>,
}

impl ReportEngine {
    /// Create an engine over an empty draft.
    pub fn new(rates: RateProvider) -> Self {
        Self {
            store: LineStore::new(),
            rates,
            total: RwLock::new(format_total(Decimal::ZERO)),
        }
    }

    /// Read access to the line store.
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// The formatted reporting-currency total as last written by the
    /// aggregator.
    pub fn total_display(&self) -> String {
        self.total.read().clone()
    }

    /// Append a fresh line and recompute the total.
    pub async fn add_line(&self) -> LineId {
        let id = self.store.add();
        self.recompute_total().await;
        id
    }

    /// Remove a line, dropping its attachment, and recompute the total.
    /// A lookup still in flight for the removed line resolves into a
    /// discarded write.
    pub async fn remove_line(&self, id: LineId) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.recompute_total().await;
        }
        removed
    }

    /// Set a line's amount from raw field input.
    pub async fn set_amount(&self, id: LineId, raw: &str) -> bool {
        if !self.store.set_amount(id, sanitize_amount(raw)) {
            return false;
        }
        self.refresh_line(id).await;
        true
    }

    /// Set a line's currency.
    pub async fn set_currency(&self, id: LineId, currency: Currency) -> bool {
        if !self.store.set_currency(id, currency) {
            return false;
        }
        self.refresh_line(id).await;
        true
    }

    /// Set or clear a line's transaction date.
    pub async fn set_date(&self, id: LineId, date: Option<NaiveDate>) -> bool {
        if !self.store.set_date(id, date) {
            return false;
        }
        self.refresh_line(id).await;
        true
    }

    /// Set a line's description. Descriptions do not feed the calculation,
    /// so nothing is recomputed.
    pub fn set_description(&self, id: LineId, description: &str) -> bool {
        self.store.set_description(id, description)
    }

    /// Attach a receipt file to a line.
    pub fn attach_receipt(&self, id: LineId, attachment: Attachment) -> bool {
        self.store.attach(id, attachment)
    }

    /// Recompute one line's conversion display. Idempotent; safe to call
    /// repeatedly with unchanged inputs.
    pub async fn update_line(&self, id: LineId) {
        let Some(snapshot) = self.store.snapshot(id) else {
            return;
        };

        // Nothing to convert: the panel is cleared synchronously, before
        // any suspension point.
        if !snapshot.has_amount() || snapshot.currency.is_reporting() {
            self.store.clear_conversion(id);
            return;
        }

        let date = snapshot.date.unwrap_or_else(today);
        let rate = self
            .rates
            .get_rate(snapshot.currency, Currency::REPORTING, date)
            .await;
        let display = ConversionDisplay::render(snapshot.amount, snapshot.currency, rate);

        if !self.store.apply_conversion(id, snapshot.revision, display) {
            debug!(line = %id, "discarding conversion superseded by a later edit");
        }
    }

    /// Recompute every line's display, then the total.
    pub async fn refresh_all(&self) {
        for id in self.store.ids() {
            self.update_line(id).await;
        }
        self.recompute_total().await;
    }

    /// Sum the reporting-currency value of the current line set and write
    /// the formatted result to the shared total display.
    ///
    /// Rates are looked up fresh per line rather than reused from the
    /// rendered displays, so the total reflects the source's answer at
    /// invocation time even when a per-line display is still in flight.
    pub async fn recompute_total(&self) -> Decimal {
        let mut total = Decimal::ZERO;

        for line in self.store.snapshot_all() {
            if !line.has_amount() {
                continue;
            }
            if line.currency.is_reporting() {
                total += line.amount;
            } else {
                let date = line.date.unwrap_or_else(today);
                let rate = self
                    .rates
                    .get_rate(line.currency, Currency::REPORTING, date)
                    .await;
                total += line.amount * rate;
            }
        }

        let total = round_amount(total);
        *self.total.write() = format_total(total);
        debug!(%total, "report total recomputed");
        total
    }

    async fn refresh_line(&self, id: LineId) {
        self.update_line(id).await;
        self.recompute_total().await;
    }
}

fn format_total(total: Decimal) -> String {
    format!("{}{total:.2}", Currency::REPORTING.symbol())
}
