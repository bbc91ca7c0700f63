//! Technical criteria — moving-average crosses, oscillators, volume
//!
//! The moving-average families are generated from the token vocabulary: one
//! criterion per (kind, length) for price crosses and one per ordered
//! (short, long) pair for MA-on-MA crosses. The token spellings these emit
//! are backend contract (`GIA_VUOT_EMA20_Daily`, `EMA5_THUNG_SMA50_Weekly`,
//! ...); the generation loops only enumerate them, they never invent any.

use super::{range_sub, token};
use crate::registry::criterion::{CriterionDef, Group, Param, Scale, TokenPart};
use crate::registry::tokens;

const G: Group = Group::Technical;

pub(crate) fn definitions() -> Vec<CriterionDef> {
    let mut defs = Vec::new();
    defs.extend(price_ma_crosses());
    defs.extend(ma_ma_crosses());
    defs.extend(price_ma_compare());
    defs.extend(rsi());
    defs.extend(macd());
    defs.extend(bollinger());
    defs.extend(volume());
    defs.extend(week52());
    defs
}

fn direction_period_params() -> Vec<Param> {
    vec![
        Param::select("direction", "Hướng cắt", tokens::direction_options()),
        Param::select("period", "Chu kỳ", tokens::period_options()),
    ]
}

/// Price crossing one moving average: `GIA_<dir>_<MA>_<period>`
fn price_ma_crosses() -> Vec<CriterionDef> {
    let fam = ("gia_cat_ma", "Giá cắt đường trung bình");
    let mut defs = Vec::new();
    for kind in ["EMA", "SMA"] {
        for len in tokens::MA_LENGTHS {
            let ma = tokens::ma_token(kind, len);
            defs.push(token(
                G,
                fam,
                &format!("gia_cat_{}{}", kind.to_lowercase(), len),
                &format!("Giá cắt {}", ma),
                direction_period_params(),
                vec![
                    TokenPart::Lit(tokens::PRICE.to_string()),
                    TokenPart::Param("direction".to_string()),
                    TokenPart::Lit(ma),
                    TokenPart::Param("period".to_string()),
                ],
            ));
        }
    }
    defs
}

/// Shorter MA crossing a longer one of the same kind: `<MA>_<dir>_<MA>_<period>`
fn ma_ma_crosses() -> Vec<CriterionDef> {
    let fam = ("ma_cat_ma", "Đường trung bình cắt nhau");
    let mut defs = Vec::new();
    for kind in ["EMA", "SMA"] {
        for (i, short) in tokens::MA_LENGTHS.iter().enumerate() {
            for long in &tokens::MA_LENGTHS[i + 1..] {
                let left = tokens::ma_token(kind, *short);
                let right = tokens::ma_token(kind, *long);
                defs.push(token(
                    G,
                    fam,
                    &format!(
                        "{}{}_cat_{}{}",
                        kind.to_lowercase(),
                        short,
                        kind.to_lowercase(),
                        long
                    ),
                    &format!("{} cắt {}", left, right),
                    direction_period_params(),
                    vec![
                        TokenPart::Lit(left),
                        TokenPart::Param("direction".to_string()),
                        TokenPart::Lit(right),
                        TokenPart::Param("period".to_string()),
                    ],
                ));
            }
        }
    }
    defs
}

/// Price level relative to a chosen MA: `GIA_<op>_<MA>_<period>`
fn price_ma_compare() -> Vec<CriterionDef> {
    let fam = ("gia_so_voi_ma", "Giá so với đường trung bình");
    ["EMA", "SMA"]
        .into_iter()
        .map(|kind| {
            token(
                G,
                fam,
                &format!("gia_so_voi_{}", kind.to_lowercase()),
                &format!("Giá so với {}", kind),
                vec![
                    Param::select("op", "So sánh", tokens::op_options()),
                    Param::select("ma", "Đường trung bình", tokens::ma_options(kind)),
                    Param::select("period", "Chu kỳ", tokens::period_options()),
                ],
                vec![
                    TokenPart::Lit(tokens::PRICE.to_string()),
                    TokenPart::Param("op".to_string()),
                    TokenPart::Param("ma".to_string()),
                    TokenPart::Param("period".to_string()),
                ],
            )
        })
        .collect()
}

fn rsi() -> Vec<CriterionDef> {
    let fam = ("rsi", "RSI");
    vec![
        range_sub(G, fam, "rsi_qua_mua", "RSI quá mua", "RSI14", Scale::None, None, (70.0, 100.0)),
        range_sub(G, fam, "rsi_qua_ban", "RSI quá bán", "RSI14", Scale::None, None, (0.0, 30.0)),
        range_sub(G, fam, "rsi_tuy_chinh", "RSI tùy chỉnh", "RSI14", Scale::None, None, (0.0, 100.0)),
    ]
}

fn macd() -> Vec<CriterionDef> {
    let fam = ("macd", "MACD");
    vec![
        token(
            G,
            fam,
            "macd_cat_signal",
            "MACD cắt đường tín hiệu",
            direction_period_params(),
            vec![
                TokenPart::Lit("MACD".to_string()),
                TokenPart::Param("direction".to_string()),
                TokenPart::Lit("SIGNAL".to_string()),
                TokenPart::Param("period".to_string()),
            ],
        ),
        token(
            G,
            fam,
            "macd_so_voi_0",
            "MACD so với 0",
            vec![
                Param::select("op", "So sánh", tokens::op_options()),
                Param::select("period", "Chu kỳ", tokens::period_options()),
            ],
            vec![
                TokenPart::Lit("MACD".to_string()),
                TokenPart::Param("op".to_string()),
                TokenPart::Lit("ZERO".to_string()),
                TokenPart::Param("period".to_string()),
            ],
        ),
    ]
}

fn bollinger() -> Vec<CriterionDef> {
    let fam = ("bollinger", "Dải Bollinger");
    [("bien_tren", "BOLL_UPPER", "Giá cắt dải Bollinger trên"),
     ("bien_duoi", "BOLL_LOWER", "Giá cắt dải Bollinger dưới")]
        .into_iter()
        .map(|(suffix, band, label)| {
            token(
                G,
                fam,
                &format!("gia_cat_bollinger_{}", suffix),
                label,
                direction_period_params(),
                vec![
                    TokenPart::Lit(tokens::PRICE.to_string()),
                    TokenPart::Param("direction".to_string()),
                    TokenPart::Lit(band.to_string()),
                    TokenPart::Param("period".to_string()),
                ],
            )
        })
        .collect()
}

fn volume() -> Vec<CriterionDef> {
    let fam = ("khoi_luong", "Khối lượng");
    let mut defs: Vec<CriterionDef> = [10u32, 20, 50]
        .into_iter()
        .map(|len| {
            token(
                G,
                fam,
                &format!("klgd_cat_trung_binh_{}", len),
                &format!("KLGD cắt trung bình {} phiên", len),
                direction_period_params(),
                vec![
                    TokenPart::Lit(tokens::VOLUME.to_string()),
                    TokenPart::Param("direction".to_string()),
                    TokenPart::Lit(format!("KLTB{}", len)),
                    TokenPart::Param("period".to_string()),
                ],
            )
        })
        .collect();
    defs.push(range_sub(
        G,
        fam,
        "khoi_luong_phien",
        "Khối lượng khớp trong phiên",
        "Volume",
        Scale::None,
        Some("CP"),
        (0.0, 50_000_000.0),
    ));
    defs
}

fn week52() -> Vec<CriterionDef> {
    let fam = ("dinh_day_52_tuan", "Đỉnh / đáy 52 tuần");
    [("gia_vuot_dinh_52_tuan", "HIGH52W", "Giá vượt đỉnh 52 tuần"),
     ("gia_thung_day_52_tuan", "LOW52W", "Giá thủng đáy 52 tuần")]
        .into_iter()
        .map(|(id, level, label)| {
            let direction = if level == "HIGH52W" {
                tokens::CROSS_UP
            } else {
                tokens::CROSS_DOWN
            };
            token(
                G,
                fam,
                id,
                label,
                vec![Param::select("period", "Chu kỳ", tokens::period_options())],
                vec![
                    TokenPart::Lit(tokens::PRICE.to_string()),
                    TokenPart::Lit(direction.to_string()),
                    TokenPart::Lit(level.to_string()),
                    TokenPart::Param("period".to_string()),
                ],
            )
        })
        .collect()
}
