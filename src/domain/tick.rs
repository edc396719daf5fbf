use serde::{Deserialize, Serialize};

/// A single price update pushed by the stream for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveTick {
    pub symbol: String,
    pub price: f64,
    pub timestamp: Option<i64>,
    pub volume: Option<f64>,
}

impl LiveTick {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            timestamp: None,
            volume: None,
        }
    }

    /// Ticks with a zero, negative or non-finite price carry nothing to draw.
    pub fn is_usable(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}
