use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

use crate::analysis::{IndicatorPoint, OverlaySpec};
use crate::config::chart::CHART;
use crate::domain::Bar;

/// Histogram column of the volume series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumePoint {
    pub time: i64,
    pub value: f64,
    pub color: Color32,
}

impl VolumePoint {
    pub fn from_bar(bar: &Bar) -> Self {
        Self {
            time: bar.time,
            value: bar.volume,
            color: if bar.is_bullish() {
                CHART.volume_up_color
            } else {
                CHART.volume_down_color
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleStyle {
    pub up_color: Color32,
    pub down_color: Color32,
}

/// Volume sits on its own invisible price scale; the margins are fractions of
/// the plot height left empty above and below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeScale {
    pub margin_top: f64,
    pub margin_bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub spec: OverlaySpec,
    pub color: Color32,
    pub width: f32,
}

/// OHLC readout for the candle under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosshairOhlc {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<&Bar> for CrosshairOhlc {
    fn from(bar: &Bar) -> Self {
        Self {
            time: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }
    }
}

/// Pointer movement over the plot, in data coordinates. `time` is `None` when
/// the pointer left the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairMove {
    pub time: Option<i64>,
}

/// Rendering backend of the live chart.
///
/// Mirrors the calls a charting widget needs: create series once, replace
/// their data wholesale, patch the newest candle, size and fit. The egui plot
/// implements it for the app; tests record the calls.
pub trait ChartSurface {
    fn add_candle_series(&mut self, style: CandleStyle);
    fn add_volume_series(&mut self, scale: VolumeScale);
    /// Returns the index later passed to `set_line_data`.
    fn add_line_series(&mut self, style: LineStyle) -> usize;

    fn set_candle_data(&mut self, bars: &[Bar]);
    /// Incremental update of the newest candle (same `time` replaces it).
    fn update_candle(&mut self, bar: Bar);
    fn set_volume_data(&mut self, points: &[VolumePoint]);
    fn set_line_data(&mut self, series: usize, points: &[IndicatorPoint]);

    fn apply_width(&mut self, width: f32);
    fn fit_content(&mut self);
    fn remove(&mut self);
}
