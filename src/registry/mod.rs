//! Criterion registry
//!
//! The registry is the immutable catalogue of screening criteria, built once
//! at startup. It isolates the backend's per-criterion key naming and unit
//! conversions: nothing outside this module knows that "Vốn hóa" travels as
//! `MarketCap` in raw VND.

pub mod criterion;
mod defs;
pub mod tokens;

pub use criterion::{
    BoolEntry, Control, CriterionDef, Group, Param, ParamKind, ParamValue, PayloadFragment,
    PayloadSpec, RangeEntry, RangeValue, Scale, SelectOption, TokenPart, Values,
};

use std::collections::HashMap;
use tracing::warn;

/// Display metadata for a server filter/response key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub label: String,
    pub unit: Option<String>,
}

/// Legacy id spellings kept resolvable for persisted selections
///
/// The catalogue went through several naming conventions; presets saved under
/// an old spelling must keep applying. New aliases are append-only.
const ID_ALIASES: [(&str, &str); 3] = [
    ("von_hoa", "von_hoa_popular"),
    ("chi_so_pe", "pe_popular"),
    ("gtgd_rong_ndtnn", "gia_tri_giao_dich_rong_cua_ndtnn"),
];

/// Resolve a possibly-legacy criterion id to its canonical spelling
pub fn resolve_id(id: &str) -> &str {
    ID_ALIASES
        .iter()
        .find(|(old, _)| *old == id)
        .map(|(_, new)| *new)
        .unwrap_or(id)
}

/// The criterion catalogue with its lookup indexes
pub struct CriterionRegistry {
    defs: Vec<CriterionDef>,
    by_id: HashMap<String, usize>,
    key_info: HashMap<String, KeyInfo>,
}

impl CriterionRegistry {
    /// Build the registry from the built-in definition tables
    pub fn new() -> Self {
        Self::from_definitions(defs::all_definitions())
    }

    fn from_definitions(defs: Vec<CriterionDef>) -> Self {
        let mut by_id = HashMap::with_capacity(defs.len());
        let mut key_info = HashMap::new();

        for (pos, def) in defs.iter().enumerate() {
            by_id.entry(def.id.clone()).or_insert(pos);
            if let Some(key) = def.server_key() {
                key_info.entry(key.to_string()).or_insert_with(|| KeyInfo {
                    label: def.label.clone(),
                    unit: def.unit.clone(),
                });
            }
        }

        let registry = Self {
            defs,
            by_id,
            key_info,
        };
        for issue in registry.validate() {
            warn!("criterion catalogue: {}", issue);
        }
        registry
    }

    /// Look up a definition by id, following the alias table
    ///
    /// `None` is a soft failure: the catalogue may have dropped an id that a
    /// persisted selection still references. Callers skip and warn.
    pub fn lookup(&self, id: &str) -> Option<&CriterionDef> {
        let canonical = resolve_id(id);
        self.by_id.get(canonical).map(|pos| &self.defs[*pos])
    }

    /// Display metadata for a server key, for labeling response columns
    ///
    /// Backed by a map precomputed from each definition's declared key, so a
    /// lookup never runs criterion logic.
    pub fn key_info(&self, server_key: &str) -> Option<&KeyInfo> {
        self.key_info.get(server_key)
    }

    /// All definitions in catalogue order
    pub fn definitions(&self) -> &[CriterionDef] {
        &self.defs
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Data-integrity check run at load time
    ///
    /// Duplicate ids shadow each other and duplicate labels make
    /// label-keyed favorites ambiguous; both are reported, never deduped.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let mut seen_ids: HashMap<&str, u32> = HashMap::new();
        let mut seen_labels: HashMap<&str, u32> = HashMap::new();
        for def in &self.defs {
            *seen_ids.entry(def.id.as_str()).or_default() += 1;
            *seen_labels.entry(def.label.as_str()).or_default() += 1;
        }
        for (id, count) in seen_ids {
            if count > 1 {
                issues.push(format!("duplicate criterion id '{}' ({} entries)", id, count));
            }
        }
        for (label, count) in seen_labels {
            if count > 1 {
                issues.push(format!(
                    "duplicate criterion label '{}' ({} entries)",
                    label, count
                ));
            }
        }

        for (old, new) in ID_ALIASES {
            if !self.by_id.contains_key(new) {
                issues.push(format!("alias '{}' points at missing id '{}'", old, new));
            }
        }

        issues.sort();
        issues
    }
}

impl Default for CriterionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
