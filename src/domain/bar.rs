use serde::{Deserialize, Serialize};

// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One OHLCV sample. `time` is seconds since epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Bar {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // A method to determine the type of candle
    pub fn candle_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.candle_type() == CandleType::Bullish
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.candle_type() {
            CandleType::Bullish => (self.open, self.close),
            CandleType::Bearish => (self.close, self.open),
        }
    }

    /// The bar as it looks after a live trade at `price`.
    /// Time and open are kept, the range widens to include the price.
    pub fn patched_with(&self, price: f64) -> Bar {
        Bar {
            time: self.time,
            open: self.open,
            high: self.high.max(price),
            low: self.low.min(price),
            close: price,
            volume: self.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_above_high_moves_high_and_close_only() {
        let bar = Bar::new(100, 10.0, 12.0, 9.0, 11.0, 500.0);
        let patched = bar.patched_with(13.5);

        assert_eq!(patched.time, 100);
        assert_eq!(patched.open, 10.0);
        assert_eq!(patched.high, 13.5);
        assert_eq!(patched.low, 9.0);
        assert_eq!(patched.close, 13.5);
        assert_eq!(patched.volume, 500.0);
    }

    #[test]
    fn patch_inside_range_keeps_extremes() {
        let bar = Bar::new(100, 10.0, 12.0, 9.0, 11.0, 0.0);
        let patched = bar.patched_with(9.5);

        assert_eq!((patched.high, patched.low, patched.close), (12.0, 9.0, 9.5));
        assert_eq!(patched.candle_type(), CandleType::Bearish);
    }

    #[test]
    fn doji_counts_as_bullish() {
        let bar = Bar::new(0, 5.0, 6.0, 4.0, 5.0, 0.0);
        assert!(bar.is_bullish());
        assert_eq!(bar.body_range(), (5.0, 5.0));
    }
}
