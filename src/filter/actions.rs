//! Filter state machine actions

use crate::registry::Values;
use serde_json::Value;

/// Everything the UI can do to a filter session
///
/// The enum is closed, so the "unknown action is a no-op" contract of the
/// reducer holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Toggle membership of an id in the staged set
    StageToggle { id: String },
    /// Empty the staged set
    StageClear,
    /// Commit every staged id as an active criterion with default values
    Apply,
    /// Shallow-merge new values into one active criterion
    ActiveUpdate { id: String, values: Values },
    /// Remove one active criterion
    ActiveRemove { id: String },
    /// Back to a fresh session, keeping page size and sort column
    ResetAll,
    LoadStart,
    LoadSuccess { rows: Vec<Value>, total: u64 },
    LoadFail { error: String },
    SetPage { page_number: u32 },
    SetSort { sort_column: String, is_desc: bool },
}
