//! VNScreener Core - Stock Screener Engine for Vietnamese Markets
//!
//! The engine behind the stock-filter and realtime price-list screens:
//! the criterion catalogue, the filter state machine and query payload
//! builder, saved presets, the screening API client, and the realtime
//! feed reconciliation engine.

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod realtime;
pub mod registry;

pub use error::{AppError, Result};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for a host binary
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vnscreener=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
