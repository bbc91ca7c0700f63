//! Criterion definition types
//!
//! A `CriterionDef` describes one user-selectable screening condition: the
//! editor controls it needs, and a declarative payload spec mapping the edited
//! values onto the server's query namespaces. All unit conversions the server
//! expects (percent fractions, billions of VND) are declared here as `Scale`
//! values so the conversion table stays auditable in one place.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// UI grouping of a criterion (a category tab, not a behavior)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Popular,
    Basic,
    Technical,
    Volatility,
    Mine,
}

/// Which parameter editor a criterion uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Range,
    Select,
    Boolean,
}

/// One selectable option of a select parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Shorthand constructor for a select option
pub fn opt(label: &str, value: &str) -> SelectOption {
    SelectOption {
        label: label.to_string(),
        value: value.to_string(),
    }
}

/// Parameter descriptor kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamKind {
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    Select {
        options: Vec<SelectOption>,
    },
    Toggle,
}

/// One editable parameter of a criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub key: String,
    pub label: String,
    pub kind: ParamKind,
}

impl Param {
    /// Numeric input parameter
    pub fn number(key: &str, label: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: ParamKind::Number {
                min,
                max,
                step: None,
            },
        }
    }

    /// Closed-option selector parameter
    pub fn select(key: &str, label: &str, options: Vec<SelectOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: ParamKind::Select { options },
        }
    }

    /// Boolean toggle parameter
    pub fn toggle(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: ParamKind::Toggle,
        }
    }
}

/// A user-supplied parameter value
///
/// Numbers may arrive as raw numbers or as text from a free-form input; both
/// are accepted and normalized when the payload is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Num(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Num(n) => Some(*n),
            ParamValue::Text(s) => s.trim().parse().ok(),
            ParamValue::Flag(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Value as a token segment for composite `faKeys` strings
    pub fn as_token(&self) -> Option<String> {
        match self {
            ParamValue::Text(s) => Some(s.clone()),
            ParamValue::Num(n) => Some(format_number(*n)),
            ParamValue::Flag(_) => None,
        }
    }
}

/// Mapping of param key to its current value
pub type Values = HashMap<String, ParamValue>;

/// Unit conversion applied before a numeric value is sent to the server
///
/// These are server contract, not presentation: percentages travel as
/// fractions, "Tỷ" (billions of VND) amounts travel as raw currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    None,
    Percent,
    Billion,
    Million,
}

impl Scale {
    pub fn apply(self, raw: f64) -> f64 {
        match self {
            Scale::None => raw,
            Scale::Percent => raw / 100.0,
            Scale::Billion => raw * 1_000_000_000.0,
            Scale::Million => raw * 1_000_000.0,
        }
    }
}

/// One piece of a composite `faKeys` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenPart {
    /// Fixed text segment
    Lit(String),
    /// Substituted from the named select parameter's current value
    Param(String),
}

/// Declarative mapping from edited values to a server query fragment
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadSpec {
    /// min/max range in the `fAFilterSub` namespace
    RangeSub { key: String, scale: Scale },
    /// min/max range in the `faFilter` namespace
    Range { key: String, scale: Scale },
    /// On/off flag in the `booleanFilter` namespace
    Flag { key: String },
    /// Composite condition token in `faKeys`, segments joined by `_`
    Token { parts: Vec<TokenPart> },
}

/// A min/max pair as the server expects it (stringly-typed numbers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeValue {
    pub min: String,
    pub max: String,
}

/// Keyed range contribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    pub key: String,
    pub value: RangeValue,
}

/// Keyed boolean contribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolEntry {
    pub key: String,
    pub value: bool,
}

/// The partial contribution one criterion makes to the final query body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadFragment {
    pub fa_keys: Vec<String>,
    pub fa_filter: Vec<RangeEntry>,
    pub fa_filter_sub: Vec<RangeEntry>,
    pub boolean_filter: Vec<BoolEntry>,
}

impl PayloadFragment {
    pub fn is_empty(&self) -> bool {
        self.fa_keys.is_empty()
            && self.fa_filter.is_empty()
            && self.fa_filter_sub.is_empty()
            && self.boolean_filter.is_empty()
    }
}

/// One screening criterion definition
///
/// Immutable after registry construction. `family_key`/`family_title` group
/// related criteria for collapsible sectioning in a picker; they carry no
/// query semantics.
#[derive(Debug, Clone)]
pub struct CriterionDef {
    pub id: String,
    pub group: Group,
    pub family_key: String,
    pub family_title: String,
    pub label: String,
    pub control: Control,
    pub params: Vec<Param>,
    /// Display unit, e.g. "Tỷ" or "%"
    pub unit: Option<String>,
    /// Overrides merged over the synthesized per-param defaults
    pub defaults: Values,
    pub payload: PayloadSpec,
}

impl CriterionDef {
    /// Server filter key this definition writes, if it writes a fixed one
    ///
    /// Token criteria assemble their key from selected values, so they have
    /// no static key and never name a response column.
    pub fn server_key(&self) -> Option<&str> {
        match &self.payload {
            PayloadSpec::RangeSub { key, .. }
            | PayloadSpec::Range { key, .. }
            | PayloadSpec::Flag { key } => Some(key),
            PayloadSpec::Token { .. } => None,
        }
    }

    /// Synthesize the default value set for this criterion
    ///
    /// Numeric params fall back to their declared bounds, then 0; selects
    /// take their first option; toggles start off. Declared `defaults`
    /// override the synthesized values.
    pub fn default_values(&self) -> Values {
        let mut values = Values::new();
        for param in &self.params {
            let value = match &param.kind {
                ParamKind::Number { min, max, .. } => {
                    let fallback = if param.key == "max" {
                        max.or(*min)
                    } else {
                        min.or(*max)
                    };
                    ParamValue::Num(fallback.unwrap_or(0.0))
                }
                ParamKind::Select { options } => match options.first() {
                    Some(o) => ParamValue::Text(o.value.clone()),
                    None => ParamValue::Text(String::new()),
                },
                ParamKind::Toggle => ParamValue::Flag(false),
            };
            values.insert(param.key.clone(), value);
        }
        for (key, value) in &self.defaults {
            values.insert(key.clone(), value.clone());
        }
        values
    }

    /// Map the current values onto this criterion's query fragment
    ///
    /// Total by contract: missing or unparseable values yield an empty
    /// fragment rather than an error, so one badly-edited criterion can
    /// never block the rest of the query.
    pub fn to_payload(&self, values: &Values) -> PayloadFragment {
        let mut fragment = PayloadFragment::default();
        match &self.payload {
            PayloadSpec::RangeSub { key, scale } => {
                if let Some(value) = range_value(values, *scale) {
                    fragment.fa_filter_sub.push(RangeEntry {
                        key: key.clone(),
                        value,
                    });
                }
            }
            PayloadSpec::Range { key, scale } => {
                if let Some(value) = range_value(values, *scale) {
                    fragment.fa_filter.push(RangeEntry {
                        key: key.clone(),
                        value,
                    });
                }
            }
            PayloadSpec::Flag { key } => {
                let flag = self
                    .params
                    .first()
                    .and_then(|p| values.get(&p.key))
                    .and_then(ParamValue::as_bool);
                if let Some(value) = flag {
                    fragment.boolean_filter.push(BoolEntry {
                        key: key.clone(),
                        value,
                    });
                }
            }
            PayloadSpec::Token { parts } => {
                let mut segments = Vec::with_capacity(parts.len());
                for part in parts {
                    match part {
                        TokenPart::Lit(text) => segments.push(text.clone()),
                        TokenPart::Param(key) => {
                            match values.get(key).and_then(ParamValue::as_token) {
                                Some(segment) => segments.push(segment),
                                None => return fragment,
                            }
                        }
                    }
                }
                fragment.fa_keys.push(segments.join("_"));
            }
        }
        fragment
    }
}

/// Read a min/max pair from the values, applying the declared scale
fn range_value(values: &Values, scale: Scale) -> Option<RangeValue> {
    let min = values.get("min").and_then(ParamValue::as_f64)?;
    let max = values.get("max").and_then(ParamValue::as_f64)?;
    Some(RangeValue {
        min: format_number(scale.apply(min)),
        max: format_number(scale.apply(max)),
    })
}

/// Format a number the way the server expects: integral values without a
/// decimal point, everything else in shortest float form
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e18 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_def(scale: Scale) -> CriterionDef {
        CriterionDef {
            id: "von_hoa_popular".to_string(),
            group: Group::Popular,
            family_key: "von_hoa".to_string(),
            family_title: "Vốn hóa".to_string(),
            label: "Vốn hóa".to_string(),
            control: Control::Range,
            params: vec![
                Param::number("min", "Từ", Some(0.0), None),
                Param::number("max", "Đến", None, Some(1000.0)),
            ],
            unit: Some("Tỷ".to_string()),
            defaults: Values::new(),
            payload: PayloadSpec::RangeSub {
                key: "MarketCap".to_string(),
                scale,
            },
        }
    }

    #[test]
    fn test_scale_apply() {
        assert_eq!(Scale::None.apply(12.0), 12.0);
        assert_eq!(Scale::Percent.apply(5.0), 0.05);
        assert_eq!(Scale::Billion.apply(100.0), 100_000_000_000.0);
        assert_eq!(Scale::Million.apply(2.0), 2_000_000.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100_000_000_000.0), "100000000000");
        assert_eq!(format_number(0.05), "0.05");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_billion_scaling_to_fragment() {
        let def = range_def(Scale::Billion);
        let mut values = Values::new();
        values.insert("min".to_string(), ParamValue::Num(100.0));
        values.insert("max".to_string(), ParamValue::Num(500.0));

        let fragment = def.to_payload(&values);
        assert_eq!(fragment.fa_filter_sub.len(), 1);
        let entry = &fragment.fa_filter_sub[0];
        assert_eq!(entry.key, "MarketCap");
        assert_eq!(entry.value.min, "100000000000");
        assert_eq!(entry.value.max, "500000000000");
    }

    #[test]
    fn test_text_values_are_parsed() {
        let def = range_def(Scale::Percent);
        let mut values = Values::new();
        values.insert("min".to_string(), ParamValue::Text("5".to_string()));
        values.insert("max".to_string(), ParamValue::Text(" 20 ".to_string()));

        let fragment = def.to_payload(&values);
        assert_eq!(fragment.fa_filter_sub[0].value.min, "0.05");
        assert_eq!(fragment.fa_filter_sub[0].value.max, "0.2");
    }

    #[test]
    fn test_missing_values_degrade_to_empty() {
        let def = range_def(Scale::Billion);
        let mut values = Values::new();
        values.insert("min".to_string(), ParamValue::Num(100.0));
        // no max
        assert!(def.to_payload(&values).is_empty());

        let mut garbage = Values::new();
        garbage.insert("min".to_string(), ParamValue::Text("abc".to_string()));
        garbage.insert("max".to_string(), ParamValue::Num(1.0));
        assert!(def.to_payload(&garbage).is_empty());
    }

    #[test]
    fn test_token_assembly() {
        let def = CriterionDef {
            id: "ema5_cat_ema20".to_string(),
            group: Group::Technical,
            family_key: "ma_cross".to_string(),
            family_title: "Đường trung bình".to_string(),
            label: "EMA5 cắt EMA20".to_string(),
            control: Control::Select,
            params: vec![
                Param::select(
                    "direction",
                    "Hướng",
                    vec![opt("Vượt", "VUOT"), opt("Thủng", "THUNG")],
                ),
                Param::select(
                    "period",
                    "Chu kỳ",
                    vec![opt("Ngày", "Daily"), opt("Tuần", "Weekly")],
                ),
            ],
            unit: None,
            defaults: Values::new(),
            payload: PayloadSpec::Token {
                parts: vec![
                    TokenPart::Lit("EMA5".to_string()),
                    TokenPart::Param("direction".to_string()),
                    TokenPart::Lit("EMA20".to_string()),
                    TokenPart::Param("period".to_string()),
                ],
            },
        };

        let values = def.default_values();
        let fragment = def.to_payload(&values);
        assert_eq!(fragment.fa_keys, vec!["EMA5_VUOT_EMA20_Daily".to_string()]);

        // a missing select value contributes nothing
        let fragment = def.to_payload(&Values::new());
        assert!(fragment.is_empty());
    }

    #[test]
    fn test_default_values() {
        let def = range_def(Scale::Billion);
        let values = def.default_values();
        assert_eq!(values.get("min"), Some(&ParamValue::Num(0.0)));
        assert_eq!(values.get("max"), Some(&ParamValue::Num(1000.0)));
    }

    #[test]
    fn test_defaults_override_synthesized() {
        let mut def = range_def(Scale::Billion);
        def.defaults
            .insert("min".to_string(), ParamValue::Num(50.0));
        let values = def.default_values();
        assert_eq!(values.get("min"), Some(&ParamValue::Num(50.0)));
    }
}
