//! Raw history records -> chart-ready bars.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Bar;
use crate::utils::TimeUtils;

#[cfg(debug_assertions)]
use crate::config::DF;

/// One row of the market service's history payload.
///
/// Depending on the window the date column is `Date` or `Datetime`, and the
/// price columns may arrive either as numbers or as numeric strings, so they
/// are kept as raw JSON until normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    #[serde(rename = "Date", alias = "date", default, skip_serializing_if = "Value::is_null")]
    pub date: Value,
    #[serde(rename = "Datetime", alias = "datetime", default, skip_serializing_if = "Value::is_null")]
    pub datetime: Value,
    #[serde(rename = "Open", alias = "open", default)]
    pub open: Value,
    #[serde(rename = "High", alias = "high", default)]
    pub high: Value,
    #[serde(rename = "Low", alias = "low", default)]
    pub low: Value,
    #[serde(rename = "Close", alias = "close", default)]
    pub close: Value,
    #[serde(rename = "Volume", alias = "volume", default)]
    pub volume: Value,
}

impl RawBar {
    /// `Date` wins when present and non-empty, otherwise `Datetime`.
    fn time_value(&self) -> &Value {
        if is_blank(&self.date) {
            &self.datetime
        } else {
            &self.date
        }
    }

    /// Canonical bar, or `None` when the row cannot be placed on a chart.
    pub fn to_bar(&self) -> Option<Bar> {
        let time = parse_time(self.time_value())?;
        let open = finite_number(&self.open)?;
        let high = finite_number(&self.high)?;
        let low = finite_number(&self.low)?;
        let close = finite_number(&self.close)?;
        let volume = finite_number(&self.volume).unwrap_or(0.0);

        Some(Bar::new(time, open, high, low, close, volume))
    }
}

/// Convert raw history rows into bars.
///
/// Rows whose open/high/low/close (or date) do not parse are dropped. Order is
/// preserved as received: no sorting, and duplicate timestamps pass through.
pub fn normalize_bars(raw: &[RawBar]) -> Vec<Bar> {
    let bars: Vec<Bar> = raw.iter().filter_map(RawBar::to_bar).collect();

    #[cfg(debug_assertions)]
    if DF.log_chart_updates && bars.len() != raw.len() {
        log::info!(
            "normalize_bars: dropped {} of {} rows",
            raw.len() - bars.len(),
            raw.len()
        );
    }

    bars
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_time(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => TimeUtils::parse_to_epoch_secs(s),
        Value::Number(n) => TimeUtils::epoch_number_to_secs(n.as_f64()?),
        _ => None,
    }
}
