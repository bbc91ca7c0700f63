//! Realtime row table
//!
//! The table the price-list screen renders: one row per subscribed ticker
//! plus a symbol→position index. Rows live behind an `Arc` and are swapped
//! wholesale, so consumers can rely on pointer identity to detect change.

use super::wire::{ParsedTick, QuoteValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Feed prices arrive in thousands of VND; rows store raw VND
const PRICE_UNIT: f64 = 1000.0;

/// One rendered stock row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    #[serde(rename = "sym")]
    pub symbol: String,
    /// Last matched price, VND
    pub p: f64,
    /// Change vs reference price, VND
    pub change: f64,
    #[serde(rename = "changePct")]
    pub change_pct: f64,
    #[serde(rename = "tradeVolume")]
    pub trade_volume: i64,
    #[serde(rename = "totalVolume")]
    pub total_volume: i64,
    #[serde(rename = "bestBid")]
    pub best_bid: QuoteValue,
    #[serde(rename = "bestAsk")]
    pub best_ask: QuoteValue,
}

impl StockRow {
    /// Fresh row with everything zeroed, as seeded from a list fetch
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            p: 0.0,
            change: 0.0,
            change_pct: 0.0,
            trade_volume: 0,
            total_volume: 0,
            best_bid: QuoteValue::Price(0.0),
            best_ask: QuoteValue::Price(0.0),
        }
    }
}

/// Partial update for one row; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPatch {
    pub p: Option<f64>,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
    pub trade_volume: Option<i64>,
    pub total_volume: Option<i64>,
    pub best_bid: Option<QuoteValue>,
    pub best_ask: Option<QuoteValue>,
}

impl RowPatch {
    /// Map a parsed tick onto the row schema, applying the unit-scale
    /// correction for price fields (volumes pass through unscaled)
    pub fn from_tick(tick: &ParsedTick) -> Self {
        let scale_quote = |q: QuoteValue| match q {
            QuoteValue::Price(p) => QuoteValue::Price(p * PRICE_UNIT),
            sentinel => sentinel,
        };
        Self {
            p: tick.price.map(|p| p * PRICE_UNIT),
            change: tick.change.map(|c| c * PRICE_UNIT),
            change_pct: tick.change_pct,
            trade_volume: tick.trade_volume,
            total_volume: tick.total_volume,
            best_bid: tick.best_bid.map(scale_quote),
            best_ask: tick.best_ask.map(scale_quote),
        }
    }

    /// Coalesce a later patch into this one, last value per field wins
    pub fn merge(&mut self, later: RowPatch) {
        if later.p.is_some() {
            self.p = later.p;
        }
        if later.change.is_some() {
            self.change = later.change;
        }
        if later.change_pct.is_some() {
            self.change_pct = later.change_pct;
        }
        if later.trade_volume.is_some() {
            self.trade_volume = later.trade_volume;
        }
        if later.total_volume.is_some() {
            self.total_volume = later.total_volume;
        }
        if later.best_bid.is_some() {
            self.best_bid = later.best_bid;
        }
        if later.best_ask.is_some() {
            self.best_ask = later.best_ask;
        }
    }

    /// New row with this patch applied, or `None` if nothing would change
    ///
    /// Value-level dirty check per field, so a patch restating the current
    /// values produces no new row (and no downstream re-render).
    pub fn apply(&self, row: &StockRow) -> Option<StockRow> {
        let mut next = row.clone();
        if let Some(p) = self.p {
            next.p = p;
        }
        if let Some(change) = self.change {
            next.change = change;
        }
        if let Some(pct) = self.change_pct {
            next.change_pct = pct;
        }
        if let Some(vol) = self.trade_volume {
            next.trade_volume = vol;
        }
        if let Some(total) = self.total_volume {
            next.total_volume = total;
        }
        if let Some(bid) = self.best_bid {
            next.best_bid = bid;
        }
        if let Some(ask) = self.best_ask {
            next.best_ask = ask;
        }
        if next == *row {
            None
        } else {
            Some(next)
        }
    }
}

/// Row array plus its symbol index
///
/// The index is rebuilt only when the row array is replaced wholesale;
/// updates never insert or remove rows, so it stays valid in between.
#[derive(Debug, Default)]
pub struct RowTable {
    rows: Arc<Vec<StockRow>>,
    index: HashMap<String, usize>,
}

impl RowTable {
    pub fn new(rows: Vec<StockRow>) -> Self {
        let mut table = Self::default();
        table.set_rows(rows);
        table
    }

    /// Replace the whole row set (fresh fetch) and rebuild the index
    pub fn set_rows(&mut self, rows: Vec<StockRow>) {
        self.index = rows
            .iter()
            .enumerate()
            .map(|(pos, row)| (row.symbol.clone(), pos))
            .collect();
        self.rows = Arc::new(rows);
    }

    /// Swap in an already-built row vector of identical shape
    pub(crate) fn swap_rows(&mut self, rows: Vec<StockRow>) {
        debug_assert_eq!(rows.len(), self.rows.len());
        self.rows = Arc::new(rows);
    }

    pub fn rows(&self) -> Arc<Vec<StockRow>> {
        Arc::clone(&self.rows)
    }

    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.symbol.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
