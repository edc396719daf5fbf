// src/models/ledger.rs
//
// Wire types of the ledger service (transactions, assets, portfolio summary).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum TransactionType {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    pub id: Option<i64>,
    pub symbol: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub quantity: Option<f64>,
    pub invested: Option<f64>,
    pub current_value: Option<f64>,
    pub pnl: Option<f64>,
}

impl Asset {
    /// Name when the ledger has one, else the ticker.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(default)]
    pub asset: Option<Asset>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub transaction_date: Option<String>,
}

impl Transaction {
    pub fn symbol(&self) -> &str {
        self.asset.as_ref().map(|a| a.symbol.as_str()).unwrap_or("-")
    }
}

/// Body for `POST /api/transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: f64,
    pub price: f64,
}

/// The summary endpoint's shape is owned by the ledger; known totals are typed,
/// anything else is kept verbatim for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioSummary {
    pub total_invested: Option<f64>,
    pub total_value: Option<f64>,
    pub total_pnl: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortfolioTotals {
    pub invested: f64,
    pub value: f64,
    pub pnl: f64,
}

impl PortfolioTotals {
    /// Missing figures count as zero.
    pub fn from_assets(assets: &[Asset]) -> Self {
        let invested: f64 = assets.iter().map(|a| a.invested.unwrap_or(0.0)).sum();
        let value: f64 = assets.iter().map(|a| a.current_value.unwrap_or(0.0)).sum();
        Self {
            invested,
            value,
            pnl: value - invested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transaction_parses_ledger_payload() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": 7,
            "asset": {"id": 1, "symbol": "AAPL", "name": "Apple Inc.", "sector": "Technology"},
            "type": "SELL",
            "quantity": 3,
            "price": 189.5,
            "transactionDate": "2024-01-02T10:00:00"
        }))
        .unwrap();

        assert_eq!(tx.kind, TransactionType::Sell);
        assert_eq!(tx.symbol(), "AAPL");
        assert_eq!(tx.price, Some(189.5));
    }

    #[test]
    fn totals_treat_missing_values_as_zero() {
        let assets = vec![
            Asset {
                symbol: "AAPL".into(),
                invested: Some(1000.0),
                current_value: Some(1250.0),
                ..Default::default()
            },
            Asset {
                symbol: "MSFT".into(),
                invested: Some(500.0),
                ..Default::default()
            },
        ];
        let totals = PortfolioTotals::from_assets(&assets);
        assert_eq!(totals.invested, 1500.0);
        assert_eq!(totals.value, 1250.0);
        assert_eq!(totals.pnl, -250.0);
        assert_eq!(PortfolioTotals::from_assets(&[]), PortfolioTotals::default());
    }

    #[test]
    fn display_name_falls_back_to_symbol() {
        let asset = Asset {
            symbol: "TSLA".into(),
            name: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(asset.display_name(), "TSLA");
    }

    #[test]
    fn transaction_type_parses_case_insensitively() {
        assert_eq!("buy".parse::<TransactionType>().unwrap(), TransactionType::Buy);
        assert_eq!(TransactionType::Sell.to_string(), "SELL");
    }
}
