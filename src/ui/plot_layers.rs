use eframe::egui::{Color32, Stroke};
use egui_plot::{HLine, Line, LineStyle as PlotLineStyle, PlotPoints, PlotUi, Polygon};

use crate::analysis::IndicatorPoint;
use crate::chart::{CandleStyle, LineStyle, VolumePoint, VolumeScale};
use crate::config::chart::CHART;
use crate::domain::Bar;

/// One overlay line as held by the plot: its style and the points last pushed.
#[derive(Debug, Clone)]
pub struct LineSeriesData {
    pub style: LineStyle,
    pub points: Vec<IndicatorPoint>,
}

/// Everything a layer may read while drawing one frame.
///
/// X coordinates are candle indices. Series keyed by time (volume, overlays)
/// are placed with [`x_positions`].
pub struct LayerContext<'a> {
    pub candles: &'a [Bar],
    pub volume: &'a [VolumePoint],
    pub lines: &'a [LineSeriesData],
    pub candle_style: Option<CandleStyle>,
    pub volume_scale: Option<VolumeScale>,
}

pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. VOLUME LAYER
// ============================================================================
pub struct VolumeLayer;

impl PlotLayer for VolumeLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let Some(scale) = ctx.volume_scale else {
            return;
        };

        let max_volume = ctx.volume.iter().map(|v| v.value).fold(0.0_f64, f64::max);
        if max_volume <= 0.0 {
            return;
        }

        // Volume has no axis of its own: it is squeezed into a band of the
        // currently visible price range.
        let bounds = plot_ui.plot_bounds();
        let y_min = *bounds.range_y().start();
        let y_max = *bounds.range_y().end();
        let height = y_max - y_min;
        if height <= f64::EPSILON {
            return;
        }
        let band_bottom = y_min + height * scale.margin_bottom;
        let band_top = y_max - height * scale.margin_top;
        let band = band_top - band_bottom;
        if band <= 0.0 {
            return;
        }

        let times: Vec<i64> = ctx.volume.iter().map(|v| v.time).collect();
        let xs = x_positions(ctx.candles, &times);

        let half_w = CHART.candle_width_pct / 2.0;
        for (point, x) in ctx.volume.iter().zip(xs) {
            let Some(x) = x else {
                continue;
            };
            if point.value <= 0.0 {
                continue;
            }
            let x = x as f64;
            let top = band_bottom + band * (point.value / max_volume);
            draw_rect(plot_ui, x - half_w, x + half_w, band_bottom, top, point.color);
        }
    }
}

// ============================================================================
// 2. CANDLESTICK LAYER
// ============================================================================
pub struct CandlestickLayer;

impl PlotLayer for CandlestickLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let Some(style) = ctx.candle_style else {
            return;
        };

        for (i, bar) in ctx.candles.iter().enumerate() {
            let color = if bar.is_bullish() {
                style.up_color
            } else {
                style.down_color
            };
            draw_candle(plot_ui, i as f64, bar, color);
        }
    }
}

// ============================================================================
// 3. OVERLAY LINES LAYER (moving averages)
// ============================================================================
pub struct OverlayLinesLayer;

impl PlotLayer for OverlayLinesLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for series in ctx.lines {
            let times: Vec<i64> = series.points.iter().map(|p| p.time).collect();
            let points: Vec<[f64; 2]> = series
                .points
                .iter()
                .zip(x_positions(ctx.candles, &times))
                .filter_map(|(p, x)| x.map(|x| [x as f64, p.value]))
                .collect();
            if points.len() < 2 {
                continue;
            }
            plot_ui.line(
                Line::new(series.style.spec.name, PlotPoints::new(points))
                    .color(series.style.color)
                    .width(series.style.width),
            );
        }
    }
}

// ============================================================================
// 4. PRICE LINE LAYER
// ============================================================================
pub struct PriceLineLayer;

impl PlotLayer for PriceLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let (Some(last), Some(style)) = (ctx.candles.last(), ctx.candle_style) else {
            return;
        };
        let color = if last.is_bullish() {
            style.up_color
        } else {
            style.down_color
        };
        plot_ui.hline(
            HLine::new("", last.close)
                .color(color.linear_multiply(0.7))
                .width(1.0)
                .style(PlotLineStyle::dashed_loose()),
        );
    }
}

// --- HELPERS ---

/// Candle index of each time, matched in order from the newest end so that
/// repeated timestamps land on successive candles and a series that starts
/// late (moving averages) lines up with the tail. Unmatched times get `None`.
pub fn x_positions(candles: &[Bar], times: &[i64]) -> Vec<Option<usize>> {
    let mut out = vec![None; times.len()];
    let mut end = candles.len();
    for (slot, &time) in out.iter_mut().zip(times).rev() {
        if let Some(i) = candles[..end].iter().rposition(|b| b.time == time) {
            *slot = Some(i);
            end = i;
        }
    }
    out
}

fn draw_candle(ui: &mut PlotUi, x: f64, bar: &Bar, color: Color32) {
    if bar.high > bar.low {
        ui.line(
            Line::new("", PlotPoints::new(vec![[x, bar.low], [x, bar.high]]))
                .color(color)
                .width(CHART.candle_wick_width),
        );
    }

    let (body_bot, body_top_raw) = bar.body_range();
    // Doji: give the body a sliver of height so it stays visible
    let body_top = if (body_top_raw - body_bot).abs() < f64::EPSILON {
        body_bot + body_bot.abs().max(1.0) * 0.0001
    } else {
        body_top_raw
    };

    let half_w = CHART.candle_width_pct / 2.0;
    draw_rect(ui, x - half_w, x + half_w, body_bot, body_top, color);
}

#[inline]
fn draw_rect(ui: &mut PlotUi, left: f64, right: f64, bottom: f64, top: f64, color: Color32) {
    let pts = vec![[left, bottom], [right, bottom], [right, top], [left, top]];
    ui.polygon(
        Polygon::new("", PlotPoints::new(pts))
            .fill_color(color)
            .stroke(Stroke::NONE),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64) -> Bar {
        Bar::new(time, 1.0, 2.0, 0.5, 1.5, 10.0)
    }

    #[test]
    fn repeated_times_map_to_successive_candles() {
        let candles = [bar(5), bar(10), bar(10), bar(20)];
        assert_eq!(
            x_positions(&candles, &[5, 10, 10, 20]),
            vec![Some(0), Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn late_starting_series_aligns_with_the_tail() {
        let candles = [bar(10), bar(10), bar(20), bar(30)];
        // A period-3 average starts at the third candle.
        assert_eq!(x_positions(&candles, &[20, 30]), vec![Some(2), Some(3)]);
        // Period 2 starts on the second of the two candles at time 10.
        assert_eq!(x_positions(&candles, &[10, 20, 30]), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn unknown_times_are_skipped() {
        let candles = [bar(10), bar(20)];
        assert_eq!(x_positions(&candles, &[15, 20]), vec![None, Some(1)]);
        assert!(x_positions(&[], &[1]).iter().all(Option::is_none));
    }
}
