//! Filter session context
//!
//! One `FilterSession` per screen instance: it owns the state behind a lock,
//! funnels every mutation through the reducer, and keeps a per-response
//! column-label cache so response columns are resolved against the registry
//! once per schema, not once per row.

use super::actions::FilterAction;
use super::payload::{build_payload, FilterPayload};
use super::reducer::reduce;
use super::state::FilterState;
use crate::registry::{CriterionRegistry, KeyInfo};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

pub struct FilterSession {
    registry: Arc<CriterionRegistry>,
    state: RwLock<FilterState>,
    /// Column label cache, valid for the current response schema
    column_info: DashMap<String, Option<KeyInfo>>,
}

impl FilterSession {
    pub fn new(registry: Arc<CriterionRegistry>) -> Self {
        Self {
            registry,
            state: RwLock::new(FilterState::default()),
            column_info: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &CriterionRegistry {
        &self.registry
    }

    /// Run one action through the reducer
    ///
    /// The write lock is held across the reduce so concurrent dispatches
    /// serialize instead of overwriting each other's state.
    pub fn dispatch(&self, action: FilterAction) {
        // a fresh result set may carry a different column schema
        if matches!(action, FilterAction::LoadSuccess { .. }) {
            self.column_info.clear();
        }
        let mut state = self.state.write();
        let next = reduce(&state, action, &self.registry);
        *state = next;
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FilterState {
        self.state.read().clone()
    }

    /// Request body for the current active criteria and query shape
    pub fn build_payload(&self) -> FilterPayload {
        let state = self.state.read();
        build_payload(
            &state.active,
            &self.registry,
            state.page_number,
            state.page_size,
            &state.sort_column,
            state.is_desc,
        )
    }

    /// Label/unit for a response column, cached per schema
    pub fn column_info(&self, server_key: &str) -> Option<KeyInfo> {
        self.column_info
            .entry(server_key.to_string())
            .or_insert_with(|| self.registry.key_info(server_key).cloned())
            .clone()
    }
}
