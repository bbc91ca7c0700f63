//! Application configuration
//!
//! Everything has a working default; a JSON config file can override any
//! subset of fields.

use crate::api::ApiConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feed settings as they appear in the config file
///
/// Durations are carried as integer milliseconds in config and converted at
/// the engine boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    pub topic: String,
    pub component: String,
    pub flush_interval_ms: u64,
    pub reconnect_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let defaults = crate::realtime::RealtimeConfig::default();
        Self {
            url: defaults.url,
            topic: defaults.topic,
            component: defaults.component,
            flush_interval_ms: defaults.flush_interval.as_millis() as u64,
            reconnect_delay_ms: defaults.reconnect_delay.as_millis() as u64,
        }
    }
}

impl FeedConfig {
    pub fn to_realtime_config(&self) -> crate::realtime::RealtimeConfig {
        crate::realtime::RealtimeConfig {
            url: self.url.clone(),
            topic: self.topic.clone(),
            component: self.component.clone(),
            flush_interval: std::time::Duration::from_millis(self.flush_interval_ms),
            reconnect_delay: std::time::Duration::from_millis(self.reconnect_delay_ms),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub feed: FeedConfig,
}

impl AppConfig {
    /// Load from a JSON file, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
