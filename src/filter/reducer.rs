//! Filter state reducer
//!
//! A pure total function: same inputs, same next state, and it never panics.
//! Staged/active editing composes with the load lifecycle flags; the only
//! dependency is the registry, consulted when staged ids are committed.

use super::actions::FilterAction;
use super::state::{ActiveCriterion, FilterState};
use crate::registry::CriterionRegistry;
use tracing::warn;

/// Compute the next state for one action
pub fn reduce(
    state: &FilterState,
    action: FilterAction,
    registry: &CriterionRegistry,
) -> FilterState {
    let mut next = state.clone();
    match action {
        FilterAction::StageToggle { id } => {
            if let Some(pos) = next.staged_ids.iter().position(|s| *s == id) {
                next.staged_ids.remove(pos);
            } else {
                next.staged_ids.push(id);
            }
        }
        FilterAction::StageClear => {
            next.staged_ids.clear();
        }
        FilterAction::Apply => {
            // staged state is fully consumed whether or not every id resolves
            let staged = std::mem::take(&mut next.staged_ids);
            for id in staged {
                let def = match registry.lookup(&id) {
                    Some(def) => def,
                    None => {
                        warn!("apply: unknown criterion id '{}', skipped", id);
                        continue;
                    }
                };
                if next.is_active(&def.id) {
                    continue;
                }
                next.active.push(ActiveCriterion::from_def(def));
            }
        }
        FilterAction::ActiveUpdate { id, values } => {
            if let Some(criterion) = next.active.iter_mut().find(|c| c.id == id) {
                for (key, value) in values {
                    criterion.values.insert(key, value);
                }
            }
        }
        FilterAction::ActiveRemove { id } => {
            next.active.retain(|c| c.id != id);
        }
        FilterAction::ResetAll => {
            next.active.clear();
            next.rows.clear();
            next.total = 0;
            next.staged_ids.clear();
            next.error = None;
            next.page_number = 1;
            // page_size / sort_column / is_desc survive a reset
        }
        FilterAction::LoadStart => {
            next.loading = true;
            next.error = None;
        }
        FilterAction::LoadSuccess { rows, total } => {
            next.loading = false;
            next.rows = rows;
            next.total = total;
        }
        FilterAction::LoadFail { error } => {
            // rows/total keep their last-known values
            next.loading = false;
            next.error = Some(error);
        }
        FilterAction::SetPage { page_number } => {
            next.page_number = page_number;
        }
        FilterAction::SetSort {
            sort_column,
            is_desc,
        } => {
            next.sort_column = sort_column;
            next.is_desc = is_desc;
        }
    }
    next
}
