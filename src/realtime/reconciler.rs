//! Feed reconciliation
//!
//! Converts a bursty stream of per-ticker updates into at most one row-set
//! swap per flush: updates buffer and coalesce between flushes, and a flush
//! swaps in a new row vector only when at least one field really changed.

use super::row::{RowPatch, RowTable, StockRow};
use super::wire::parse_message;
use chrono::NaiveTime;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
pub struct Reconciler {
    table: RowTable,
    pending: HashMap<String, RowPatch>,
}

impl Reconciler {
    pub fn new(rows: Vec<StockRow>) -> Self {
        Self {
            table: RowTable::new(rows),
            pending: HashMap::new(),
        }
    }

    /// Replace the displayed row set (fresh fetch); pending updates for
    /// tickers that are no longer present die at the next flush
    pub fn set_rows(&mut self, rows: Vec<StockRow>) {
        self.table.set_rows(rows);
    }

    pub fn rows(&self) -> Arc<Vec<StockRow>> {
        self.table.rows()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.table.symbols()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Parse and buffer one feed message
    ///
    /// Returns whether anything was buffered. Malformed messages and
    /// updates for unindexed tickers are dropped here, not surfaced: the
    /// feed is allowed to be noisy and to carry tickers we don't display.
    pub fn ingest(&mut self, raw: &str, now: NaiveTime) -> bool {
        let tick = match parse_message(raw, now) {
            Ok(tick) => tick,
            Err(e) => {
                debug!("dropped feed message: {}", e);
                return false;
            }
        };
        if self.table.position(&tick.ticker).is_none() {
            return false;
        }
        let patch = RowPatch::from_tick(&tick);
        self.pending
            .entry(tick.ticker)
            .or_default()
            .merge(patch);
        true
    }

    /// Apply all buffered updates as one batched row-set swap
    ///
    /// Returns whether the row set changed. The pending buffer is cleared
    /// unconditionally, changed or not. Rows are never inserted or removed,
    /// so the symbol index stays valid across flushes.
    pub fn flush(&mut self) -> bool {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return false;
        }

        let current = self.table.rows();
        let mut next: Option<Vec<StockRow>> = None;
        for (ticker, patch) in pending {
            let pos = match self.table.position(&ticker) {
                Some(pos) => pos,
                None => continue,
            };
            let row = match &next {
                Some(rows) => &rows[pos],
                None => &current[pos],
            };
            if let Some(updated) = patch.apply(row) {
                next.get_or_insert_with(|| current.as_ref().clone())[pos] = updated;
            }
        }

        match next {
            Some(rows) => {
                self.table.swap_rows(rows);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::wire::QuoteValue;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(vec![StockRow::empty("ABC"), StockRow::empty("XYZ")])
    }

    #[test]
    fn test_price_scale_correction() {
        let mut rec = reconciler();
        assert!(rec.ingest(
            "STOCK|HOSE#ABC|12.5|0.3|2.46|15300|1234500|12.4|12.6",
            at(10, 0)
        ));
        assert!(rec.flush());

        let rows = rec.rows();
        let row = &rows[0];
        assert_eq!(row.p, 12500.0);
        assert_eq!(row.change, 300.0);
        assert_eq!(row.change_pct, 2.46);
        assert_eq!(row.trade_volume, 15300);
        assert_eq!(row.total_volume, 1234500);
        assert_eq!(row.best_bid, QuoteValue::Price(12400.0));
    }

    #[test]
    fn test_unknown_ticker_never_inserts() {
        let mut rec = reconciler();
        let before = rec.rows();
        assert!(!rec.ingest(
            "STOCK|HOSE#GHOST|12.5|0.3|2.46|100|200|12.4|12.6",
            at(10, 0)
        ));
        assert!(!rec.flush());

        let after = rec.rows();
        assert_eq!(after.len(), before.len());
        // no change means no new row vector either
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_coalescing_last_value_wins() {
        let mut rec = reconciler();
        for price in ["12.1", "12.2", "12.5"] {
            let msg = format!("STOCK|HOSE#ABC|{}||||||", price);
            assert!(rec.ingest(&msg, at(10, 0)));
        }
        assert!(rec.flush());
        assert_eq!(rec.rows()[0].p, 12500.0);

        // same end state as a single update carrying the last value
        let mut single = reconciler();
        single.ingest("STOCK|HOSE#ABC|12.5||||||", at(10, 0));
        single.flush();
        assert_eq!(single.rows()[0], rec.rows()[0]);
    }

    #[test]
    fn test_no_real_change_keeps_row_identity() {
        let mut rec = reconciler();
        rec.ingest("STOCK|HOSE#ABC|12.5||||||", at(10, 0));
        rec.flush();
        let before = rec.rows();

        // same value again: buffered, but flush must not produce a new set
        assert!(rec.ingest("STOCK|HOSE#ABC|12.5||||||", at(10, 0)));
        assert!(!rec.flush());
        assert!(Arc::ptr_eq(&before, &rec.rows()));
        assert!(!rec.has_pending());
    }

    #[test]
    fn test_flush_batches_multiple_tickers() {
        let mut rec = reconciler();
        rec.ingest("STOCK|HOSE#ABC|12.5||||||", at(10, 0));
        rec.ingest("STOCK|HNX#XYZ|40.0||||||", at(10, 0));
        assert!(rec.flush());
        let rows = rec.rows();
        assert_eq!(rows[0].p, 12500.0);
        assert_eq!(rows[1].p, 40000.0);
    }

    #[test]
    fn test_malformed_message_is_dropped() {
        let mut rec = reconciler();
        assert!(!rec.ingest("garbage", at(10, 0)));
        assert!(!rec.has_pending());
        assert!(!rec.flush());
    }

    #[test]
    fn test_pending_for_removed_ticker_dies_at_flush() {
        let mut rec = reconciler();
        rec.ingest("STOCK|HOSE#ABC|12.5||||||", at(10, 0));
        rec.set_rows(vec![StockRow::empty("XYZ")]);
        assert!(!rec.flush());
        assert_eq!(rec.rows().len(), 1);
    }
}
