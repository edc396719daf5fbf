//! Wire format of the price stream.
//!
//! The server pushes `{"type":"data","data":{"AAPL":{"price":189.2,...}}}`.
//! Occasionally several objects arrive in one frame separated by newlines, so
//! a frame is decoded whole first and line by line as a fallback.

use serde_json::{Value, json};

use crate::domain::LiveTick;

/// Subscription request sent once the socket is open.
pub fn subscribe_message(symbols: &[String]) -> String {
    json!({ "action": "subscribe", "symbols": symbols }).to_string()
}

/// Every JSON message contained in one text frame.
///
/// Lines that fail to parse are logged and skipped; they never abort the rest.
pub fn decode_frame(text: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => vec![v],
        Err(e) => {
            log::warn!("Stream frame is not a single JSON message ({e}), splitting on newlines");
            text.split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .filter_map(|line| match serde_json::from_str::<Value>(line) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        log::warn!("Dropping unparsable stream line: {e}");
                        None
                    }
                })
                .collect()
        }
    }
}

/// Ticks carried by a single decoded message. Anything that is not a `data`
/// message yields nothing.
pub fn ticks_from_message(msg: &Value) -> Vec<LiveTick> {
    if msg.get("type").and_then(Value::as_str) != Some("data") {
        return Vec::new();
    }
    let Some(entries) = msg.get("data").and_then(Value::as_object) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(symbol, entry)| {
            let price = number(entry.get("price")?)?;
            Some(LiveTick {
                symbol: symbol.clone(),
                price,
                timestamp: entry
                    .get("timestamp")
                    .or_else(|| entry.get("time"))
                    .and_then(number)
                    .map(|t| t as i64),
                volume: entry.get("volume").and_then(number),
            })
        })
        .collect()
}

/// Convenience: decode a frame and flatten its ticks in arrival order.
pub fn ticks_from_frame(text: &str) -> Vec<LiveTick> {
    decode_frame(text).iter().flat_map(ticks_from_message).collect()
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_joined_messages_are_both_delivered() {
        let frame = concat!(
            r#"{"type":"data","data":{"AAPL":{"price":190.1}}}"#,
            "\n",
            r#"{"type":"data","data":{"MSFT":{"price":"401.5"}}}"#
        );

        let msgs = decode_frame(frame);
        assert_eq!(msgs.len(), 2);

        let ticks = ticks_from_frame(frame);
        assert_eq!(ticks, vec![LiveTick::new("AAPL", 190.1), LiveTick::new("MSFT", 401.5)]);
    }

    #[test]
    fn corrupt_line_is_skipped_between_valid_ones() {
        let frame = concat!(
            r#"{"type":"data","data":{"AAPL":{"price":1}}}"#,
            "\n",
            r#"{"type":"data","data":{"AAPL":"#,
            "\n",
            r#"{"type":"data","data":{"AAPL":{"price":2}}}"#,
            "\n"
        );

        let msgs = decode_frame(frame);
        assert_eq!(msgs.len(), 2);
        let prices: Vec<f64> = ticks_from_frame(frame).iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![1.0, 2.0]);
    }

    #[test]
    fn non_data_messages_yield_no_ticks() {
        let frame = r#"{"type":"subscribed","symbols":["AAPL"]}"#;
        assert_eq!(decode_frame(frame).len(), 1);
        assert!(ticks_from_frame(frame).is_empty());
    }

    #[test]
    fn entries_without_a_numeric_price_are_skipped() {
        let frame = r#"{"type":"data","data":{
            "AAPL":{"price":190.0,"volume":1200,"timestamp":1704205800},
            "MSFT":{"price":"n/a"},
            "TSLA":{"change":1.2}
        }}"#;

        let ticks = ticks_from_frame(frame);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].volume, Some(1200.0));
        assert_eq!(ticks[0].timestamp, Some(1_704_205_800));
    }

    #[test]
    fn subscribe_message_shape() {
        let msg: Value = serde_json::from_str(&subscribe_message(&["AAPL".to_string()])).unwrap();
        assert_eq!(msg, json!({"action": "subscribe", "symbols": ["AAPL"]}));
    }
}
