//! Push-feed wire format
//!
//! Messages are pipe-delimited; the second segment is `#`-delimited and
//! carries the ticker in position 1; the remaining segments are positional
//! value fields. Offsets are an external contract and must not be
//! renumbered:
//!
//! ```text
//! STOCK|HOSE#VNM#G1|62.5|0.4|0.64|15300|1234500|62.4|62.6
//!   0      1          2    3    4     5      6      7    8
//! ticker segment      price chg chg%  vol  total   bid  ask
//! ```
//!
//! During the two daily call-auction windows the exchange publishes no firm
//! bid/ask, so populated bid/ask fields are rendered as the "ATO"/"ATC"
//! sentinels instead of prices.

use crate::error::{AppError, Result};
use chrono::NaiveTime;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Opening / closing call-auction phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionPhase {
    /// At-the-open, 09:00–09:15
    Ato,
    /// At-the-close, 14:30–14:45
    Atc,
}

/// Which auction window, if any, contains the given exchange-local time
///
/// Both windows are half-open `[start, end)`.
pub fn auction_phase(time: NaiveTime) -> Option<AuctionPhase> {
    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid window bound")
    }
    let (ato_start, ato_end) = (hm(9, 0), hm(9, 15));
    let (atc_start, atc_end) = (hm(14, 30), hm(14, 45));

    if time >= ato_start && time < ato_end {
        Some(AuctionPhase::Ato)
    } else if time >= atc_start && time < atc_end {
        Some(AuctionPhase::Atc)
    } else {
        None
    }
}

/// A quoted price, or an auction sentinel when the market is in call auction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuoteValue {
    Price(f64),
    Ato,
    Atc,
}

impl QuoteValue {
    pub fn from_phase(phase: AuctionPhase) -> Self {
        match phase {
            AuctionPhase::Ato => QuoteValue::Ato,
            AuctionPhase::Atc => QuoteValue::Atc,
        }
    }

    pub fn as_price(&self) -> Option<f64> {
        match self {
            QuoteValue::Price(p) => Some(*p),
            _ => None,
        }
    }
}

impl Serialize for QuoteValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            QuoteValue::Price(p) => serializer.serialize_f64(*p),
            QuoteValue::Ato => serializer.serialize_str("ATO"),
            QuoteValue::Atc => serializer.serialize_str("ATC"),
        }
    }
}

impl<'de> Deserialize<'de> for QuoteValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct QuoteVisitor;

        impl<'de> Visitor<'de> for QuoteVisitor {
            type Value = QuoteValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a price number or \"ATO\"/\"ATC\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<QuoteValue, E> {
                Ok(QuoteValue::Price(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<QuoteValue, E> {
                Ok(QuoteValue::Price(v as f64))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<QuoteValue, E> {
                Ok(QuoteValue::Price(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<QuoteValue, E> {
                match v {
                    "ATO" => Ok(QuoteValue::Ato),
                    "ATC" => Ok(QuoteValue::Atc),
                    other => Err(E::custom(format!("unknown quote label '{}'", other))),
                }
            }
        }

        deserializer.deserialize_any(QuoteVisitor)
    }
}

/// One parsed feed message, values still in feed units
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTick {
    pub ticker: String,
    /// Last matched price, thousands of VND
    pub price: Option<f64>,
    /// Change vs reference, thousands of VND
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
    pub trade_volume: Option<i64>,
    pub total_volume: Option<i64>,
    pub best_bid: Option<QuoteValue>,
    pub best_ask: Option<QuoteValue>,
}

/// Parse one feed message
///
/// `now` is the exchange-local wall clock, injected so auction gating is
/// testable. Any malformed segment fails the whole message; the caller
/// drops it.
pub fn parse_message(raw: &str, now: NaiveTime) -> Result<ParsedTick> {
    let segments: Vec<&str> = raw.split('|').collect();
    if segments.len() < 9 {
        return Err(AppError::Feed(format!(
            "message has {} segments, expected 9",
            segments.len()
        )));
    }

    let ticker = segments[1]
        .split('#')
        .nth(1)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Feed(format!("no ticker in segment '{}'", segments[1])))?
        .to_string();

    let phase = auction_phase(now);
    // the field is validated either way; the window only changes how a
    // populated quote is rendered, an empty field stays "no update"
    let quote = |field: &str| -> Result<Option<QuoteValue>> {
        Ok(num_field(field)?.map(|price| match phase {
            Some(phase) => QuoteValue::from_phase(phase),
            None => QuoteValue::Price(price),
        }))
    };

    Ok(ParsedTick {
        ticker,
        price: num_field(segments[2])?,
        change: num_field(segments[3])?,
        change_pct: num_field(segments[4])?,
        trade_volume: int_field(segments[5])?,
        total_volume: int_field(segments[6])?,
        best_bid: quote(segments[7])?,
        best_ask: quote(segments[8])?,
    })
}

/// Empty field means "no update"; anything non-numeric is malformed
fn num_field(field: &str) -> Result<Option<f64>> {
    if field.is_empty() {
        return Ok(None);
    }
    field
        .parse::<f64>()
        .map(Some)
        .map_err(|_| AppError::Feed(format!("bad numeric field '{}'", field)))
}

fn int_field(field: &str) -> Result<Option<i64>> {
    if field.is_empty() {
        return Ok(None);
    }
    field
        .parse::<i64>()
        .map(Some)
        .map_err(|_| AppError::Feed(format!("bad integer field '{}'", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    const MSG: &str = "STOCK|HOSE#ABC#G1|12.5|0.3|2.46|15300|1234500|12.4|12.6";

    #[test]
    fn test_parse_continuous_session() {
        let tick = parse_message(MSG, at(10, 30)).unwrap();
        assert_eq!(tick.ticker, "ABC");
        assert_eq!(tick.price, Some(12.5));
        assert_eq!(tick.change, Some(0.3));
        assert_eq!(tick.change_pct, Some(2.46));
        assert_eq!(tick.trade_volume, Some(15300));
        assert_eq!(tick.total_volume, Some(1234500));
        assert_eq!(tick.best_bid, Some(QuoteValue::Price(12.4)));
        assert_eq!(tick.best_ask, Some(QuoteValue::Price(12.6)));
    }

    #[test]
    fn test_auction_window_sentinels() {
        let tick = parse_message(MSG, at(9, 0)).unwrap();
        assert_eq!(tick.best_bid, Some(QuoteValue::Ato));
        assert_eq!(tick.best_ask, Some(QuoteValue::Ato));
        // price fields are not gated
        assert_eq!(tick.price, Some(12.5));

        let tick = parse_message(MSG, at(14, 44)).unwrap();
        assert_eq!(tick.best_bid, Some(QuoteValue::Atc));

        // windows are half-open
        assert_eq!(auction_phase(at(9, 15)), None);
        assert_eq!(auction_phase(at(14, 45)), None);
        assert_eq!(auction_phase(at(14, 30)), Some(AuctionPhase::Atc));
    }

    #[test]
    fn test_auction_window_keeps_field_semantics() {
        // an empty field is still "no update" inside the window
        let tick = parse_message("STOCK|HOSE#ABC|12.5||||1234500||", at(9, 5)).unwrap();
        assert_eq!(tick.best_bid, None);
        assert_eq!(tick.best_ask, None);

        // and a malformed field still rejects the whole message
        assert!(parse_message("STOCK|HOSE#ABC|12.5||||1234500|x|12.6", at(9, 5)).is_err());
    }

    #[test]
    fn test_empty_fields_mean_no_update() {
        let tick = parse_message("STOCK|HOSE#ABC|12.5||||1234500||", at(10, 0)).unwrap();
        assert_eq!(tick.price, Some(12.5));
        assert_eq!(tick.change, None);
        assert_eq!(tick.trade_volume, None);
        assert_eq!(tick.total_volume, Some(1234500));
        assert_eq!(tick.best_bid, None);
    }

    #[test]
    fn test_malformed_messages_are_rejected() {
        assert!(parse_message("STOCK|HOSE#ABC|12.5", at(10, 0)).is_err());
        assert!(parse_message("STOCK|NOTICKER|1|2|3|4|5|6|7", at(10, 0)).is_err());
        assert!(parse_message("STOCK|HOSE#ABC|abc|2|3|4|5|6|7", at(10, 0)).is_err());
    }

    #[test]
    fn test_quote_value_serde() {
        assert_eq!(
            serde_json::to_string(&QuoteValue::Price(12.4)).unwrap(),
            "12.4"
        );
        assert_eq!(serde_json::to_string(&QuoteValue::Ato).unwrap(), "\"ATO\"");
        let parsed: QuoteValue = serde_json::from_str("\"ATC\"").unwrap();
        assert_eq!(parsed, QuoteValue::Atc);
        let parsed: QuoteValue = serde_json::from_str("12400").unwrap();
        assert_eq!(parsed, QuoteValue::Price(12400.0));
    }
}
