//! The ordered, mutable collection of expense lines backing a draft.
//!
//! All mutation happens synchronously under an internal lock that is never
//! held across a suspension point. A suspended lookup writes back through
//! [`LineStore::apply_conversion`], which re-validates that the target line
//! still exists and that no later edit superseded the lookup.

use chrono::NaiveDate;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::debug;

use spesen_common::{round_amount, Currency, LineId};

use crate::display::ConversionDisplay;
use crate::line::{Attachment, ExpenseLine};

/// Snapshot of the fields a rate lookup depends on, taken synchronously
/// before any suspension point.
#[derive(Debug, Clone, Copy)]
pub struct LineSnapshot {
    pub id: LineId,
    pub amount: Decimal,
    pub currency: Currency,
    pub date: Option<NaiveDate>,
    pub revision: u64,
}

impl LineSnapshot {
    fn of(line: &ExpenseLine) -> Self {
        Self {
            id: line.id,
            amount: line.amount,
            currency: line.currency,
            date: line.date,
            revision: line.revision,
        }
    }

    /// Whether the snapshot contributes to the total.
    pub fn has_amount(&self) -> bool {
        !self.amount.is_zero()
    }
}

/// The single shared mutable collection of a report draft. Insertion order
/// is display and iteration order.
///
/// Mutating a calculation input through the store does not re-run the
/// calculator or the aggregator; the engine's mutators are the write path
/// that keeps a draft consistent.
pub struct LineStore {
    lines: RwLock<Vec<ExpenseLine>>,
}

impl LineStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            lines: RwLock::new(Vec::new()),
        }
    }

    /// Append a fresh empty line and return its id.
    pub fn add(&self) -> LineId {
        let line = ExpenseLine::new();
        let id = line.id;
        self.lines.write().push(line);
        debug!(line = %id, "expense line added");
        id
    }

    /// Remove a line. The line's attachment is dropped with it.
    pub fn remove(&self, id: LineId) -> bool {
        let mut lines = self.lines.write();
        let before = lines.len();
        lines.retain(|line| line.id != id);
        let removed = lines.len() < before;
        if removed {
            debug!(line = %id, "expense line removed");
        }
        removed
    }

    /// Number of lines in the draft.
    pub fn len(&self) -> usize {
        self.lines.read().len()
    }

    /// Whether the draft has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.read().is_empty()
    }

    /// Line ids in insertion order.
    pub fn ids(&self) -> Vec<LineId> {
        self.lines.read().iter().map(|line| line.id).collect()
    }

    /// Calculation snapshot of one line.
    pub fn snapshot(&self, id: LineId) -> Option<LineSnapshot> {
        self.lines
            .read()
            .iter()
            .find(|line| line.id == id)
            .map(LineSnapshot::of)
    }

    /// Calculation snapshots of every line, in insertion order.
    pub fn snapshot_all(&self) -> Vec<LineSnapshot> {
        self.lines.read().iter().map(LineSnapshot::of).collect()
    }

    /// Full clone of every line, in insertion order. This is what the
    /// submission assembler walks.
    pub fn export(&self) -> Vec<ExpenseLine> {
        self.lines.read().clone()
    }

    /// The attachment owned by a line, if any.
    pub fn attachment(&self, id: LineId) -> Option<Attachment> {
        self.lines
            .read()
            .iter()
            .find(|line| line.id == id)
            .and_then(|line| line.attachment.clone())
    }

    /// The last-rendered conversion display of a line, if any.
    pub fn conversion(&self, id: LineId) -> Option<ConversionDisplay> {
        self.lines
            .read()
            .iter()
            .find(|line| line.id == id)
            .and_then(|line| line.conversion.clone())
    }

    /// Set a line's amount. The value is sanitized before it is persisted.
    pub fn set_amount(&self, id: LineId, amount: Decimal) -> bool {
        self.mutate_input(id, |line| {
            line.amount = round_amount(amount.abs());
        })
    }

    /// Set a line's currency. Switching to the reporting currency clears
    /// the conversion display in the same critical section, so the line
    /// can never hold a stale display on that transition.
    pub fn set_currency(&self, id: LineId, currency: Currency) -> bool {
        self.mutate_input(id, |line| {
            line.currency = currency;
            if currency.is_reporting() {
                line.conversion = None;
            }
        })
    }

    /// Set or clear a line's transaction date.
    pub fn set_date(&self, id: LineId, date: Option<NaiveDate>) -> bool {
        self.mutate_input(id, |line| {
            line.date = date;
        })
    }

    /// Set a line's description. Not a calculation input; the revision is
    /// untouched so an in-flight lookup stays valid.
    pub fn set_description(&self, id: LineId, description: &str) -> bool {
        self.mutate(id, |line| {
            line.description = description.trim().to_string();
        })
    }

    /// Attach a receipt file to a line, replacing any previous one.
    pub fn attach(&self, id: LineId, attachment: Attachment) -> bool {
        self.mutate(id, |line| {
            line.attachment = Some(attachment);
        })
    }

    /// Clear a line's conversion display.
    pub fn clear_conversion(&self, id: LineId) {
        self.mutate(id, |line| {
            line.conversion = None;
        });
    }

    /// Write back a rendered conversion for the given revision.
    ///
    /// Returns `false` without writing when the line is gone or a later
    /// edit bumped the revision while the lookup was in flight.
    pub fn apply_conversion(
        &self,
        id: LineId,
        revision: u64,
        display: ConversionDisplay,
    ) -> bool {
        let mut lines = self.lines.write();
        match lines.iter_mut().find(|line| line.id == id) {
            Some(line) if line.revision == revision => {
                line.conversion = Some(display);
                true
            }
            _ => false,
        }
    }

    /// Mutate a calculation input: the closure runs under the write lock
    /// and the line's revision is bumped afterwards.
    fn mutate_input(&self, id: LineId, f: impl FnOnce(&mut ExpenseLine)) -> bool {
        let mut lines = self.lines.write();
        match lines.iter_mut().find(|line| line.id == id) {
            Some(line) => {
                f(line);
                line.revision += 1;
                true
            }
            None => false,
        }
    }

    fn mutate(&self, id: LineId, f: impl FnOnce(&mut ExpenseLine)) -> bool {
        let mut lines = self.lines.write();
        match lines.iter_mut().find(|line| line.id == id) {
            Some(line) => {
                f(line);
                true
            }
            None => false,
        }
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insertion_order_is_iteration_order() {
        let store = LineStore::new();
        let first = store.add();
        let second = store.add();
        let third = store.add();

        assert_eq!(store.ids(), vec![first, second, third]);
    }

    #[test]
    fn test_remove_keeps_sibling_order() {
        let store = LineStore::new();
        let first = store.add();
        let second = store.add();
        let third = store.add();

        assert!(store.remove(second));
        assert_eq!(store.ids(), vec![first, third]);
        assert!(!store.remove(second));
    }

    #[test]
    fn test_set_amount_sanitizes() {
        let store = LineStore::new();
        let id = store.add();

        store.set_amount(id, dec!(-12.345));
        assert_eq!(store.snapshot(id).unwrap().amount, dec!(12.35));
    }

    #[test]
    fn test_input_mutations_bump_revision() {
        let store = LineStore::new();
        let id = store.add();
        assert_eq!(store.snapshot(id).unwrap().revision, 0);

        store.set_amount(id, dec!(10));
        store.set_currency(id, Currency::Usd);
        store.set_date(id, NaiveDate::from_ymd_opt(2024, 3, 7));
        assert_eq!(store.snapshot(id).unwrap().revision, 3);

        store.set_description(id, "taxi");
        assert_eq!(store.snapshot(id).unwrap().revision, 3);
    }

    #[test]
    fn test_apply_conversion_discards_stale_revision() {
        let store = LineStore::new();
        let id = store.add();
        store.set_amount(id, dec!(10));
        let stale = store.snapshot(id).unwrap().revision;

        store.set_amount(id, dec!(20));
        let display = ConversionDisplay::render(dec!(10), Currency::Usd, dec!(0.9));

        assert!(!store.apply_conversion(id, stale, display.clone()));
        assert!(store.conversion(id).is_none());

        let current = store.snapshot(id).unwrap().revision;
        assert!(store.apply_conversion(id, current, display));
        assert!(store.conversion(id).is_some());
    }

    #[test]
    fn test_apply_conversion_ignores_removed_line() {
        let store = LineStore::new();
        let id = store.add();
        let revision = store.snapshot(id).unwrap().revision;
        store.remove(id);

        let display = ConversionDisplay::render(dec!(10), Currency::Usd, dec!(0.9));
        assert!(!store.apply_conversion(id, revision, display));
    }

    #[test]
    fn test_switch_to_reporting_clears_conversion() {
        let store = LineStore::new();
        let id = store.add();
        store.set_currency(id, Currency::Usd);
        store.set_amount(id, dec!(10));

        let revision = store.snapshot(id).unwrap().revision;
        store.apply_conversion(
            id,
            revision,
            ConversionDisplay::render(dec!(10), Currency::Usd, dec!(0.9)),
        );
        assert!(store.conversion(id).is_some());

        store.set_currency(id, Currency::REPORTING);
        assert!(store.conversion(id).is_none());
    }

    #[test]
    fn test_removed_line_releases_attachment() {
        let store = LineStore::new();
        let id = store.add();
        store.attach(id, Attachment::new("receipt.pdf", "application/pdf", vec![1, 2, 3]));
        assert!(store.attachment(id).is_some());

        store.remove(id);
        assert!(store.attachment(id).is_none());
    }
}
