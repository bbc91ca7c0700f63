//! Near-real-time price list: wire parsing, row reconciliation, feed engine

pub mod engine;
pub mod reconciler;
pub mod row;
pub mod wire;

pub use engine::{FeedConnection, FeedStatus, FeedTransport, RealtimeConfig, RealtimeEngine, WsFeedTransport};
pub use reconciler::Reconciler;
pub use row::{RowPatch, RowTable, StockRow};
pub use wire::{auction_phase, parse_message, AuctionPhase, ParsedTick, QuoteValue};
