//! Query payload builder
//!
//! Folds every active criterion's fragment into the one request body the
//! screening endpoint accepts. The body's field names and null-vs-empty
//! choices are wire contract and must not drift.

use super::state::ActiveCriterion;
use crate::registry::{CriterionRegistry, RangeValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// The three supported exchanges, always sent in this order
pub const EXCHANGES: [&str; 3] = ["HOSE", "HNX", "UPCOM"];

/// Always-on flag pre-seeded into `booleanFilter`
pub const BASE_BOOLEAN_FLAG: &str = "IsActive";

/// Business floor/ceiling always forced into `faFilter.MarketCap`,
/// overriding anything a criterion contributed for that key
pub const MARKET_CAP_BOUND: (&str, &str) = ("100000000000", "10000000000000000");

/// The screening endpoint's request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPayload {
    #[serde(rename = "faFilter")]
    pub fa_filter: BTreeMap<String, RangeValue>,
    #[serde(rename = "taFilter")]
    pub ta_filter: Option<serde_json::Value>,
    #[serde(rename = "booleanFilter")]
    pub boolean_filter: BTreeMap<String, bool>,
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub exchanges: Vec<String>,
    #[serde(rename = "icbCodes")]
    pub icb_codes: Option<Vec<String>>,
    #[serde(rename = "sortColumn")]
    pub sort_column: String,
    #[serde(rename = "isDesc")]
    pub is_desc: bool,
    #[serde(rename = "fAFilterSub")]
    pub fa_filter_sub: BTreeMap<String, RangeValue>,
    #[serde(rename = "faKeys")]
    pub fa_keys: Vec<String>,
    #[serde(rename = "wlOrPId")]
    pub wl_or_p_id: Option<String>,
    #[serde(rename = "tradingTime")]
    pub trading_time: Option<String>,
}

/// Build the request body for the current active criteria and query shape
///
/// Infallible: a criterion whose definition cannot be resolved, or whose
/// values produce nothing, contributes nothing — one bad criterion never
/// blocks the rest. Duplicate server keys resolve last-write-wins in
/// application order; that overwrite is intentional, not a merge.
pub fn build_payload(
    active: &[ActiveCriterion],
    registry: &CriterionRegistry,
    page_number: u32,
    page_size: u32,
    sort_column: &str,
    is_desc: bool,
) -> FilterPayload {
    let mut fa_filter = BTreeMap::new();
    let mut fa_filter_sub = BTreeMap::new();
    let mut boolean_filter = BTreeMap::new();
    let mut fa_keys = Vec::new();

    boolean_filter.insert(BASE_BOOLEAN_FLAG.to_string(), true);

    for criterion in active {
        let def = match registry.lookup(&criterion.id) {
            Some(def) => def,
            None => {
                warn!(
                    "payload: no definition for active criterion '{}', skipped",
                    criterion.id
                );
                continue;
            }
        };
        let fragment = def.to_payload(&criterion.values);
        if fragment.is_empty() {
            warn!("payload: criterion '{}' produced no fragment", criterion.id);
            continue;
        }
        for entry in fragment.fa_filter {
            fa_filter.insert(entry.key, entry.value);
        }
        for entry in fragment.fa_filter_sub {
            fa_filter_sub.insert(entry.key, entry.value);
        }
        for entry in fragment.boolean_filter {
            boolean_filter.insert(entry.key, entry.value);
        }
        fa_keys.extend(fragment.fa_keys);
    }

    // non-negotiable business bound, applied after all criteria
    fa_filter.insert(
        "MarketCap".to_string(),
        RangeValue {
            min: MARKET_CAP_BOUND.0.to_string(),
            max: MARKET_CAP_BOUND.1.to_string(),
        },
    );

    FilterPayload {
        fa_filter,
        ta_filter: None,
        boolean_filter,
        page_number,
        page_size,
        exchanges: EXCHANGES.iter().map(|e| e.to_string()).collect(),
        icb_codes: None,
        sort_column: sort_column.to_string(),
        is_desc,
        fa_filter_sub,
        fa_keys,
        wl_or_p_id: None,
        trading_time: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ParamValue, Values};

    fn active(registry: &CriterionRegistry, id: &str) -> ActiveCriterion {
        let def = registry.lookup(id).expect("known id");
        super::super::state::ActiveCriterion::from_def(def)
    }

    fn build(registry: &CriterionRegistry, active: &[ActiveCriterion]) -> FilterPayload {
        build_payload(active, registry, 1, 20, "MarketCap", true)
    }

    #[test]
    fn test_fixed_shape_defaults() {
        let registry = CriterionRegistry::new();
        let payload = build(&registry, &[]);
        assert_eq!(payload.exchanges, vec!["HOSE", "HNX", "UPCOM"]);
        assert!(payload.ta_filter.is_none());
        assert!(payload.icb_codes.is_none());
        assert!(payload.wl_or_p_id.is_none());
        assert!(payload.trading_time.is_none());
        assert_eq!(payload.boolean_filter.get(BASE_BOOLEAN_FLAG), Some(&true));
        assert!(payload.fa_keys.is_empty());
        assert!(payload.fa_filter_sub.is_empty());
    }

    #[test]
    fn test_market_cap_scaling_example() {
        let registry = CriterionRegistry::new();
        let mut criterion = active(&registry, "von_hoa_popular");
        criterion.values.insert("min".to_string(), ParamValue::Num(100.0));
        criterion.values.insert("max".to_string(), ParamValue::Num(500.0));

        let payload = build(&registry, &[criterion]);
        let range = payload.fa_filter_sub.get("MarketCap").expect("range present");
        assert_eq!(range.min, "100000000000");
        assert_eq!(range.max, "500000000000");
    }

    #[test]
    fn test_foreign_value_scaling_example() {
        let registry = CriterionRegistry::new();
        let mut criterion = active(&registry, "gia_tri_giao_dich_rong_cua_ndtnn");
        criterion.values.insert("min".to_string(), ParamValue::Num(1.0));
        criterion.values.insert("max".to_string(), ParamValue::Num(2.0));

        let payload = build(&registry, &[criterion]);
        let range = payload
            .fa_filter_sub
            .get("ForeignBuySellValue_")
            .expect("range present");
        assert_eq!(range.min, "1000000000");
        assert_eq!(range.max, "2000000000");
    }

    #[test]
    fn test_market_cap_override_is_unconditional() {
        let registry = CriterionRegistry::new();
        let payload = build(&registry, &[]);
        let bound = payload.fa_filter.get("MarketCap").expect("bound present");
        assert_eq!(bound.min, MARKET_CAP_BOUND.0);
        assert_eq!(bound.max, MARKET_CAP_BOUND.1);

        // present and fixed regardless of a user MarketCap criterion
        let mut criterion = active(&registry, "von_hoa_popular");
        criterion.values.insert("min".to_string(), ParamValue::Num(7.0));
        criterion.values.insert("max".to_string(), ParamValue::Num(8.0));
        let payload = build(&registry, &[criterion]);
        let bound = payload.fa_filter.get("MarketCap").expect("bound present");
        assert_eq!(bound.min, MARKET_CAP_BOUND.0);
    }

    #[test]
    fn test_partial_failure_isolation() {
        let registry = CriterionRegistry::new();
        let mut broken = active(&registry, "pe_popular");
        broken.values = Values::new(); // no min/max, produces nothing
        let mut unknown = active(&registry, "pb_popular");
        unknown.id = "da_bi_xoa_khoi_catalogue".to_string();
        let good = active(&registry, "von_hoa_popular");

        let payload = build(&registry, &[broken, unknown, good]);
        assert!(payload.fa_filter_sub.contains_key("MarketCap"));
        assert!(!payload.fa_filter_sub.contains_key("PE"));
        assert!(!payload.fa_filter_sub.contains_key("PB"));
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let registry = CriterionRegistry::new();
        // rsi_qua_mua and rsi_qua_ban both target RSI14
        let overbought = active(&registry, "rsi_qua_mua");
        let oversold = active(&registry, "rsi_qua_ban");

        let payload = build(&registry, &[overbought, oversold]);
        let range = payload.fa_filter_sub.get("RSI14").expect("RSI14 present");
        assert_eq!(range.min, "0");
        assert_eq!(range.max, "30");
    }

    #[test]
    fn test_payload_determinism() {
        let registry = CriterionRegistry::new();
        let criteria = vec![
            active(&registry, "von_hoa_popular"),
            active(&registry, "gia_cat_ema20"),
            active(&registry, "chi_tra_co_tuc_deu"),
        ];
        let first = build(&registry, &criteria);
        let second = build(&registry, &criteria);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_wire_field_names() {
        let registry = CriterionRegistry::new();
        let payload = build(&registry, &[active(&registry, "gia_cat_ema20")]);
        let json = serde_json::to_value(&payload).unwrap();
        for field in [
            "faFilter",
            "taFilter",
            "booleanFilter",
            "pageNumber",
            "pageSize",
            "exchanges",
            "icbCodes",
            "sortColumn",
            "isDesc",
            "fAFilterSub",
            "faKeys",
            "wlOrPId",
            "tradingTime",
        ] {
            assert!(json.get(field).is_some(), "missing wire field {}", field);
        }
        assert_eq!(json["taFilter"], serde_json::Value::Null);
        assert_eq!(json["faKeys"][0], "GIA_VUOT_EMA20_Daily");
    }
}
