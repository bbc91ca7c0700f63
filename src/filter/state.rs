//! Filter session state

use crate::registry::{Control, CriterionDef, Group, Values};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A criterion the user has committed to the current query
///
/// `label`, `control` and `group` are denormalized from the definition at
/// apply time so list headers render without a registry lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCriterion {
    pub id: String,
    pub label: String,
    pub control: Control,
    pub group: Group,
    pub values: Values,
}

impl ActiveCriterion {
    /// Hydrate from a definition with its default values
    pub fn from_def(def: &CriterionDef) -> Self {
        Self {
            id: def.id.clone(),
            label: def.label.clone(),
            control: def.control,
            group: def.group,
            values: def.default_values(),
        }
    }
}

/// Single source of truth for one filter session
///
/// Result rows are opaque: the backend returns different columns depending
/// on which criteria were queried.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Criterion ids picked in the selection modal but not yet committed
    pub staged_ids: Vec<String>,
    /// Committed criteria, in application order
    pub active: Vec<ActiveCriterion>,
    pub rows: Vec<Value>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub page_number: u32,
    pub page_size: u32,
    pub sort_column: String,
    pub is_desc: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            staged_ids: Vec::new(),
            active: Vec::new(),
            rows: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            page_number: 1,
            page_size: 20,
            sort_column: "MarketCap".to_string(),
            is_desc: true,
        }
    }
}

impl FilterState {
    pub fn is_staged(&self, id: &str) -> bool {
        self.staged_ids.iter().any(|s| s == id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|c| c.id == id)
    }
}
