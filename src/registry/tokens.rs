//! Composite condition token vocabulary
//!
//! `faKeys` tokens are assembled from these segments joined by underscores,
//! e.g. `EMA5_VUOT_EMA20_Daily` or `GIA_THUNG_SMA50_Weekly`. The vocabulary
//! is a closed external contract with the screening backend; none of these
//! spellings may be invented or renamed.

use super::criterion::{opt, SelectOption};

/// Moving-average lengths the backend knows about
pub const MA_LENGTHS: [u32; 7] = [5, 10, 15, 20, 50, 100, 200];

/// Token segment for the last traded price
pub const PRICE: &str = "GIA";
/// Token segment for session traded volume
pub const VOLUME: &str = "KLGD";

/// Cross direction: breaks above
pub const CROSS_UP: &str = "VUOT";
/// Cross direction: breaks below
pub const CROSS_DOWN: &str = "THUNG";

/// Comparison operators for level conditions
pub const OP_GTE: &str = ">=";
pub const OP_EQ: &str = "=";
pub const OP_LTE: &str = "<=";

/// Evaluation periods
pub const PERIOD_DAILY: &str = "Daily";
pub const PERIOD_WEEKLY: &str = "Weekly";

/// `EMA5`, `SMA200`, ...
pub fn ma_token(kind: &str, length: u32) -> String {
    format!("{}{}", kind, length)
}

/// Options for a cross-direction select parameter
pub fn direction_options() -> Vec<SelectOption> {
    vec![opt("Vượt lên", CROSS_UP), opt("Thủng xuống", CROSS_DOWN)]
}

/// Options for an evaluation-period select parameter
pub fn period_options() -> Vec<SelectOption> {
    vec![opt("Ngày", PERIOD_DAILY), opt("Tuần", PERIOD_WEEKLY)]
}

/// Options for a comparison-operator select parameter
pub fn op_options() -> Vec<SelectOption> {
    vec![
        opt("Lớn hơn hoặc bằng", OP_GTE),
        opt("Bằng", OP_EQ),
        opt("Nhỏ hơn hoặc bằng", OP_LTE),
    ]
}

/// Options listing every moving average of one kind (`EMA` or `SMA`)
pub fn ma_options(kind: &str) -> Vec<SelectOption> {
    MA_LENGTHS
        .iter()
        .map(|len| {
            let token = ma_token(kind, *len);
            SelectOption {
                label: token.clone(),
                value: token,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ma_token_spelling() {
        assert_eq!(ma_token("EMA", 5), "EMA5");
        assert_eq!(ma_token("SMA", 200), "SMA200");
    }

    #[test]
    fn test_option_values_use_contract_spellings() {
        let directions: Vec<String> = direction_options()
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(directions, vec!["VUOT", "THUNG"]);

        let periods: Vec<String> = period_options().into_iter().map(|o| o.value).collect();
        assert_eq!(periods, vec!["Daily", "Weekly"]);
    }
}
