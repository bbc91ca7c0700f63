//! Criterion definition tables
//!
//! One submodule per picker group. The tables are data: every entry pins an
//! id, a display label, the server key or token recipe it maps to, and the
//! unit conversion the backend expects for it.

mod basic;
mod popular;
mod technical;
mod volatility;

use super::criterion::{Control, CriterionDef, Group, Param, PayloadSpec, Scale, Values};

/// Every criterion definition, in catalogue order
pub fn all_definitions() -> Vec<CriterionDef> {
    let mut defs = Vec::new();
    defs.extend(popular::definitions());
    defs.extend(basic::definitions());
    defs.extend(technical::definitions());
    defs.extend(volatility::definitions());
    defs
}

/// Range criterion writing the `fAFilterSub` namespace
#[allow(clippy::too_many_arguments)]
pub(crate) fn range_sub(
    group: Group,
    family: (&str, &str),
    id: &str,
    label: &str,
    key: &str,
    scale: Scale,
    unit: Option<&str>,
    bounds: (f64, f64),
) -> CriterionDef {
    range_def(
        group,
        family,
        id,
        label,
        unit,
        bounds,
        PayloadSpec::RangeSub {
            key: key.to_string(),
            scale,
        },
    )
}

/// Range criterion writing the `faFilter` namespace
#[allow(clippy::too_many_arguments)]
pub(crate) fn range_main(
    group: Group,
    family: (&str, &str),
    id: &str,
    label: &str,
    key: &str,
    scale: Scale,
    unit: Option<&str>,
    bounds: (f64, f64),
) -> CriterionDef {
    range_def(
        group,
        family,
        id,
        label,
        unit,
        bounds,
        PayloadSpec::Range {
            key: key.to_string(),
            scale,
        },
    )
}

fn range_def(
    group: Group,
    family: (&str, &str),
    id: &str,
    label: &str,
    unit: Option<&str>,
    bounds: (f64, f64),
    payload: PayloadSpec,
) -> CriterionDef {
    let (lo, hi) = bounds;
    CriterionDef {
        id: id.to_string(),
        group,
        family_key: family.0.to_string(),
        family_title: family.1.to_string(),
        label: label.to_string(),
        control: Control::Range,
        params: vec![
            Param::number("min", "Từ", Some(lo), Some(hi)),
            Param::number("max", "Đến", Some(lo), Some(hi)),
        ],
        unit: unit.map(str::to_string),
        defaults: Values::new(),
        payload,
    }
}

/// Boolean toggle criterion writing the `booleanFilter` namespace
pub(crate) fn flag(
    group: Group,
    family: (&str, &str),
    id: &str,
    label: &str,
    key: &str,
) -> CriterionDef {
    CriterionDef {
        id: id.to_string(),
        group,
        family_key: family.0.to_string(),
        family_title: family.1.to_string(),
        label: label.to_string(),
        control: Control::Boolean,
        params: vec![Param::toggle("enabled", label)],
        unit: None,
        defaults: Values::new(),
        payload: PayloadSpec::Flag {
            key: key.to_string(),
        },
    }
}

/// Select criterion assembling a composite `faKeys` token
pub(crate) fn token(
    group: Group,
    family: (&str, &str),
    id: &str,
    label: &str,
    params: Vec<Param>,
    parts: Vec<super::criterion::TokenPart>,
) -> CriterionDef {
    CriterionDef {
        id: id.to_string(),
        group,
        family_key: family.0.to_string(),
        family_title: family.1.to_string(),
        label: label.to_string(),
        control: Control::Select,
        params,
        unit: None,
        defaults: Values::new(),
        payload: PayloadSpec::Token { parts },
    }
}
