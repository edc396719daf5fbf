//! Wire types of the market service (search, info, quote, history, optimize).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::RawBar;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub data: Vec<RawBar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuote {
    pub symbol: String,
    pub shortname: Option<String>,
    pub longname: Option<String>,
    pub exchange: Option<String>,
    #[serde(rename = "quoteType")]
    pub quote_type: Option<String>,
}

impl SearchQuote {
    pub fn label(&self) -> &str {
        self.shortname
            .as_deref()
            .or(self.longname.as_deref())
            .unwrap_or(&self.symbol)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub quotes: Vec<SearchQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: SearchResults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockInfo {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    pub current_price: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockInfoResponse {
    #[serde(default)]
    pub info: StockInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockQuote {
    pub symbol: Option<String>,
    pub price: Option<f64>,
    pub change: Option<f64>,
    #[serde(alias = "changePercent")]
    pub change_percent: Option<f64>,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Allocation {
    pub selected: bool,
    pub live_value: Option<f64>,
    pub current_value: Option<f64>,
}

impl Allocation {
    /// Live value when the optimizer had one, otherwise the stored value.
    pub fn display_value(&self) -> f64 {
        self.live_value.or(self.current_value).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationResult {
    pub optimal_allocation: BTreeMap<String, Allocation>,
}

impl OptimizationResult {
    pub fn selected(&self) -> impl Iterator<Item = (&str, &Allocation)> {
        self.optimal_allocation
            .iter()
            .filter(|(_, a)| a.selected)
            .map(|(s, a)| (s.as_str(), a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn info_reads_camel_case_fields() {
        let resp: StockInfoResponse = serde_json::from_value(json!({
            "info": {"shortName": "Apple Inc.", "sector": "Technology",
                     "marketCap": 2.9e12, "trailingPE": 29.4, "currentPrice": 189.1}
        }))
        .unwrap();
        assert_eq!(resp.info.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(resp.info.trailing_pe, Some(29.4));
        assert_eq!(resp.info.current_price, Some(189.1));
    }

    #[test]
    fn search_tolerates_missing_quotes() {
        let resp: SearchResponse = serde_json::from_value(json!({"results": {}})).unwrap();
        assert!(resp.results.quotes.is_empty());
    }

    #[test]
    fn only_selected_allocations_are_listed() {
        let result: OptimizationResult = serde_json::from_value(json!({
            "optimal_allocation": {
                "AAPL": {"selected": true, "live_value": 0.0, "current_value": 120.0},
                "MSFT": {"selected": false, "current_value": 80.0},
                "NVDA": {"selected": true, "current_value": 55.5}
            }
        }))
        .unwrap();

        let picked: Vec<(&str, f64)> = result
            .selected()
            .map(|(s, a)| (s, a.display_value()))
            .collect();
        assert_eq!(picked, vec![("AAPL", 0.0), ("NVDA", 55.5)]);
    }
}
