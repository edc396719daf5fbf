use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use eframe::egui::{Frame, Ui, Vec2b};
use egui_plot::{AxisHints, HPlacement, Plot, VPlacement};

use crate::analysis::IndicatorPoint;
use crate::chart::{CandleStyle, ChartSurface, LineStyle, VolumePoint, VolumeScale};
use crate::config::chart::CHART;
use crate::domain::Bar;
use crate::ui::plot_layers::{
    CandlestickLayer, LayerContext, LineSeriesData, OverlayLinesLayer, PlotLayer, PriceLineLayer,
    VolumeLayer,
};
use crate::ui::utils::format_price;
use crate::utils::{TimeUtils, epoch_sec_to_label};

#[cfg(debug_assertions)]
use crate::config::DF;

/// What the plot reports back after drawing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrameOutput {
    /// Bar time under the pointer, `None` when the pointer is elsewhere.
    pub pointer_time: Option<i64>,
    /// Width the plot was given this frame.
    pub available_width: f32,
}

/// egui_plot rendition of the live chart.
///
/// Holds exactly what was pushed through [`ChartSurface`] and draws it with
/// the layer stack every frame.
#[derive(Debug, Default)]
pub struct EguiChartSurface {
    candle_style: Option<CandleStyle>,
    volume_scale: Option<VolumeScale>,
    lines: Vec<LineSeriesData>,
    candles: Vec<Bar>,
    index_by_time: HashMap<i64, usize>,
    volume: Vec<VolumePoint>,
    width: f32,
    fit_pending: bool,
    removed: bool,
}

impl EguiChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candles(&self) -> &[Bar] {
        &self.candles
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn bar_at(&self, time: i64) -> Option<&Bar> {
        self.index_by_time.get(&time).and_then(|&i| self.candles.get(i))
    }

    fn rebuild_index(&mut self) {
        self.index_by_time = self
            .candles
            .iter()
            .enumerate()
            .map(|(i, b)| (b.time, i))
            .collect();
    }

    fn x_bounds(&self) -> RangeInclusive<f64> {
        let n = self.candles.len().max(1) as f64;
        -0.5..=(n - 0.5)
    }

    fn y_bounds(&self) -> RangeInclusive<f64> {
        let (min, max) = self
            .candles
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
                (lo.min(b.low), hi.max(b.high))
            });
        if !min.is_finite() || !max.is_finite() {
            return 0.0..=1.0;
        }
        let range = (max - min).max(max.abs() * 0.01).max(f64::EPSILON);
        let pad = range * CHART.plot_y_padding_pct;
        // The volume band takes the bottom of the plot; leave room under the lows
        let volume_room = self
            .volume_scale
            .map(|s| range * (1.0 - s.margin_top) / s.margin_top.max(0.1))
            .unwrap_or(0.0);
        (min - pad - volume_room)..=(max + pad)
    }

    fn time_axis(&self) -> AxisHints<'static> {
        let times: Arc<Vec<i64>> = Arc::new(self.candles.iter().map(|b| b.time).collect());
        let with_time = times
            .windows(2)
            .any(|w| (w[1] - w[0]).abs() < TimeUtils::SECS_IN_D);

        AxisHints::new_x()
            .formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx < 0.0 || (mark.value - idx).abs() > 1e-6 {
                    return String::new();
                }
                times
                    .get(idx as usize)
                    .map(|&t| epoch_sec_to_label(t, with_time))
                    .unwrap_or_default()
            })
            .placement(VPlacement::Bottom)
    }

    /// Draw the chart into `ui` and report pointer and size.
    pub fn show(&mut self, ui: &mut Ui) -> ChartFrameOutput {
        let available_width = ui.available_width();
        if self.removed {
            return ChartFrameOutput {
                pointer_time: None,
                available_width,
            };
        }

        let fit = std::mem::take(&mut self.fit_pending).then(|| (self.x_bounds(), self.y_bounds()));

        let y_axis = AxisHints::new_y()
            .formatter(|mark, _range| format_price(mark.value))
            .placement(HPlacement::Right);

        let ctx = LayerContext {
            candles: &self.candles,
            volume: &self.volume,
            lines: &self.lines,
            candle_style: self.candle_style,
            volume_scale: self.volume_scale,
        };
        let candles = &self.candles;
        let width = if self.width > 0.0 {
            self.width
        } else {
            available_width
        };

        let pointer_time = Frame::new()
            .fill(CHART.background_color)
            .stroke((1.0, CHART.border_color))
            .show(ui, |ui| {
                Plot::new("live_chart")
                    .height(CHART.height)
                    .width(width)
                    .custom_x_axes(vec![self.time_axis()])
                    .custom_y_axes(vec![y_axis])
                    .label_formatter(|_, _| String::new())
                    .show_background(false)
                    .allow_double_click_reset(false)
                    .allow_scroll(Vec2b { x: true, y: false })
                    .show(ui, |plot_ui| {
                        if let Some((x, y)) = fit.clone() {
                            plot_ui.set_plot_bounds_x(x);
                            plot_ui.set_plot_bounds_y(y);
                        }

                        let layers: [&dyn PlotLayer; 4] = [
                            &VolumeLayer,
                            &OverlayLinesLayer,
                            &CandlestickLayer,
                            &PriceLineLayer,
                        ];
                        for layer in layers {
                            layer.render(plot_ui, &ctx);
                        }

                        let bounds = plot_ui.plot_bounds();
                        plot_ui.pointer_coordinate().and_then(|p| {
                            if !bounds.range_x().contains(&p.x) || !bounds.range_y().contains(&p.y)
                            {
                                return None;
                            }
                            let idx = p.x.round();
                            if idx < 0.0 {
                                return None;
                            }
                            candles.get(idx as usize).map(|b| b.time)
                        })
                    })
                    .inner
            })
            .inner;

        ChartFrameOutput {
            pointer_time,
            available_width,
        }
    }
}

impl ChartSurface for EguiChartSurface {
    fn add_candle_series(&mut self, style: CandleStyle) {
        self.candle_style = Some(style);
    }

    fn add_volume_series(&mut self, scale: VolumeScale) {
        self.volume_scale = Some(scale);
    }

    fn add_line_series(&mut self, style: LineStyle) -> usize {
        self.lines.push(LineSeriesData {
            style,
            points: Vec::new(),
        });
        self.lines.len() - 1
    }

    fn set_candle_data(&mut self, bars: &[Bar]) {
        self.candles = bars.to_vec();
        self.rebuild_index();
    }

    fn update_candle(&mut self, bar: Bar) {
        match self.candles.last_mut() {
            Some(last) if last.time == bar.time => *last = bar,
            Some(last) if last.time > bar.time => {
                #[cfg(debug_assertions)]
                if DF.log_chart_updates {
                    log::info!("Ignoring candle update older than the newest bar ({})", bar.time);
                }
            }
            _ => {
                self.index_by_time.insert(bar.time, self.candles.len());
                self.candles.push(bar);
            }
        }
    }

    fn set_volume_data(&mut self, points: &[VolumePoint]) {
        self.volume = points.to_vec();
    }

    fn set_line_data(&mut self, series: usize, points: &[IndicatorPoint]) {
        if let Some(line) = self.lines.get_mut(series) {
            line.points = points.to_vec();
        }
    }

    fn apply_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    fn fit_content(&mut self) {
        self.fit_pending = true;
    }

    fn remove(&mut self) {
        self.removed = true;
        self.candle_style = None;
        self.volume_scale = None;
        self.lines.clear();
        self.candles.clear();
        self.index_by_time.clear();
        self.volume.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, close: f64) -> Bar {
        Bar::new(time, close, close + 1.0, close - 1.0, close, 100.0)
    }

    #[test]
    fn update_candle_replaces_same_time_and_appends_newer() {
        let mut s = EguiChartSurface::new();
        s.set_candle_data(&[bar(10, 1.0), bar(20, 2.0)]);

        s.update_candle(bar(20, 5.0));
        assert_eq!(s.candles().len(), 2);
        assert_eq!(s.candles()[1].close, 5.0);

        s.update_candle(bar(30, 6.0));
        assert_eq!(s.candles().len(), 3);
        assert_eq!(s.bar_at(30).map(|b| b.close), Some(6.0));

        s.update_candle(bar(15, 9.0));
        assert_eq!(s.candles().len(), 3);
        assert!(s.bar_at(15).is_none());
    }

    #[test]
    fn line_series_indices_follow_creation_order() {
        let mut s = EguiChartSurface::new();
        let styles: Vec<usize> = CHART
            .overlays
            .iter()
            .map(|o| {
                s.add_line_series(LineStyle {
                    spec: o.spec,
                    color: o.color,
                    width: o.line_width,
                })
            })
            .collect();
        assert_eq!(styles, vec![0, 1, 2]);

        s.set_line_data(1, &[IndicatorPoint { time: 1, value: 2.0 }]);
        s.set_line_data(7, &[IndicatorPoint { time: 1, value: 2.0 }]);
        assert!(s.lines[0].points.is_empty());
        assert_eq!(s.lines[1].points.len(), 1);
    }

    #[test]
    fn remove_clears_everything() {
        let mut s = EguiChartSurface::new();
        s.add_candle_series(CandleStyle {
            up_color: CHART.candle_up_color,
            down_color: CHART.candle_down_color,
        });
        s.set_candle_data(&[bar(1, 1.0)]);
        s.apply_width(-5.0);
        assert_eq!(s.width(), 0.0);

        s.remove();
        assert!(s.is_removed());
        assert!(s.candles().is_empty());
        assert!(s.bar_at(1).is_none());
    }

    #[test]
    fn y_bounds_cover_all_lows_and_highs() {
        let mut s = EguiChartSurface::new();
        s.set_candle_data(&[bar(1, 10.0), bar(2, 20.0)]);
        let y = s.y_bounds();
        assert!(*y.start() < 9.0);
        assert!(*y.end() > 21.0);
    }
}
