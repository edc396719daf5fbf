use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::analysis::{OverlaySeries, compute_overlays};
use crate::chart::observers::{Signal, Subscription};
use crate::chart::surface::{
    CandleStyle, ChartSurface, CrosshairMove, CrosshairOhlc, LineStyle, VolumePoint, VolumeScale,
};
use crate::config::chart::CHART;
use crate::domain::{Bar, LiveTick};

#[cfg(debug_assertions)]
use crate::config::DF;

pub type CrosshairCallback = Box<dyn FnMut(CrosshairOhlc)>;

/// Fetch tokens are unique across every chart ever mounted, so a result
/// addressed to an earlier mount can never match a later one.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Events produced by the container a chart is mounted in.
#[derive(Default)]
pub struct ChartEvents {
    /// New container width in points.
    pub resize: Signal<f32>,
    pub crosshair: Signal<CrosshairMove>,
}

struct ChartState<S> {
    surface: S,
    /// Bars exactly as fetched. Never patched.
    bars: Vec<Bar>,
    /// Last bar as currently displayed, when a tick has been applied.
    live: Option<Bar>,
    overlays: Vec<OverlaySeries>,
    line_series: Vec<usize>,
}

impl<S> ChartState<S> {
    fn displayed_bar_at(&self, time: i64) -> Option<Bar> {
        let idx = self.bars.iter().rposition(|b| b.time == time)?;
        match self.live {
            Some(live) if idx + 1 == self.bars.len() => Some(live),
            _ => Some(self.bars[idx]),
        }
    }
}

/// Candlestick chart with volume and moving-average overlays, patched in
/// place by live prices.
///
/// State is shared with the observers registered on the container, which only
/// hold weak references. After `teardown` every entry point is a no-op.
pub struct LiveChart<S: ChartSurface + 'static> {
    state: Rc<RefCell<Option<ChartState<S>>>>,
    generation: u64,
    subscriptions: Vec<Subscription>,
}

impl<S: ChartSurface + 'static> LiveChart<S> {
    pub fn mount(
        mut surface: S,
        events: &ChartEvents,
        initial_width: f32,
        on_crosshair: Option<CrosshairCallback>,
    ) -> Self {
        surface.add_candle_series(CandleStyle {
            up_color: CHART.candle_up_color,
            down_color: CHART.candle_down_color,
        });
        surface.add_volume_series(VolumeScale {
            margin_top: CHART.volume_scale_margin_top,
            margin_bottom: CHART.volume_scale_margin_bottom,
        });
        let line_series = CHART
            .overlays
            .iter()
            .map(|o| {
                surface.add_line_series(LineStyle {
                    spec: o.spec,
                    color: o.color,
                    width: o.line_width,
                })
            })
            .collect();
        surface.apply_width(initial_width);

        let state = Rc::new(RefCell::new(Some(ChartState {
            surface,
            bars: Vec::new(),
            live: None,
            overlays: Vec::new(),
            line_series,
        })));

        let mut subscriptions = Vec::with_capacity(2);

        let weak = Rc::downgrade(&state);
        subscriptions.push(events.resize.subscribe(move |width| {
            with_live_state(&weak, |s| s.surface.apply_width(*width));
        }));

        if let Some(mut callback) = on_crosshair {
            let weak = Rc::downgrade(&state);
            subscriptions.push(events.crosshair.subscribe(move |ev: &CrosshairMove| {
                let Some(time) = ev.time else {
                    return;
                };
                // Release the borrow before handing control to the callback.
                let hit = with_live_state(&weak, |s| s.displayed_bar_at(time)).flatten();
                if let Some(bar) = hit {
                    callback(CrosshairOhlc::from(&bar));
                }
            }));
        }

        Self {
            state,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            subscriptions,
        }
    }

    /// Token for the fetch about to be issued. Any older token stops being accepted.
    pub fn begin_request(&mut self) -> u64 {
        self.generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation && self.is_mounted()
    }

    /// Apply a fetched history if it still belongs to this chart's latest
    /// request. Returns whether it was applied.
    pub fn apply_history(&mut self, generation: u64, bars: Vec<Bar>) -> bool {
        if !self.accepts(generation) {
            #[cfg(debug_assertions)]
            if DF.log_chart_updates {
                log::info!(
                    "Dropping stale history (gen {} != {})",
                    generation,
                    self.generation
                );
            }
            return false;
        }
        self.set_bars(bars);
        true
    }

    /// Replace the whole bar sequence: candles, volume and every overlay.
    pub fn set_bars(&mut self, bars: Vec<Bar>) {
        let mut guard = self.state.borrow_mut();
        let Some(state) = guard.as_mut() else {
            return;
        };

        state.live = None;
        if bars.is_empty() {
            // Nothing to draw; the surface keeps whatever it showed.
            state.bars.clear();
            state.overlays.clear();
            return;
        }

        let volume: Vec<VolumePoint> = bars.iter().map(VolumePoint::from_bar).collect();
        let overlays = compute_overlays(&bars, &CHART.overlay_specs());

        state.surface.set_candle_data(&bars);
        state.surface.set_volume_data(&volume);
        for (series, overlay) in state.line_series.iter().zip(&overlays) {
            state.surface.set_line_data(*series, &overlay.points);
        }
        state.surface.fit_content();

        #[cfg(debug_assertions)]
        if DF.log_chart_updates {
            log::info!("Chart data replaced: {} bars", bars.len());
        }

        state.bars = bars;
        state.overlays = overlays;
    }

    /// Patch the newest candle with a live price. Overlays and volume are
    /// left alone. Returns whether anything was drawn.
    pub fn apply_live_price(&mut self, price: f64) -> bool {
        if !price.is_finite() || price <= 0.0 {
            return false;
        }
        let mut guard = self.state.borrow_mut();
        let Some(state) = guard.as_mut() else {
            return false;
        };
        let Some(last) = state.bars.last() else {
            return false;
        };

        let patched = last.patched_with(price);
        state.surface.update_candle(patched);
        state.live = Some(patched);

        #[cfg(debug_assertions)]
        if DF.log_price_stream_updates {
            log::info!("Live patch @{} -> {:.4}", patched.time, price);
        }
        true
    }

    pub fn apply_tick(&mut self, tick: &LiveTick) -> bool {
        self.apply_live_price(tick.price)
    }

    /// Bars as fetched, before any live patch.
    pub fn bars(&self) -> Vec<Bar> {
        self.read(|s| s.bars.clone()).unwrap_or_default()
    }

    /// What the candle series currently shows for the newest bar.
    pub fn displayed_last(&self) -> Option<Bar> {
        self.read(|s| s.live.or_else(|| s.bars.last().copied()))
            .flatten()
    }

    pub fn overlays(&self) -> Vec<OverlaySeries> {
        self.read(|s| s.overlays.clone()).unwrap_or_default()
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Run `f` against the surface while mounted.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        self.state.borrow_mut().as_mut().map(|s| f(&mut s.surface))
    }

    /// Deregister observers and remove the surface.
    pub fn teardown(&mut self) {
        self.subscriptions.clear();
        let taken = self.state.borrow_mut().take();
        if let Some(mut state) = taken {
            state.surface.remove();

            #[cfg(debug_assertions)]
            if DF.log_chart_updates {
                log::info!("Chart torn down");
            }
        }
    }

    fn read<R>(&self, f: impl FnOnce(&ChartState<S>) -> R) -> Option<R> {
        self.state.borrow().as_ref().map(f)
    }
}

impl<S: ChartSurface + 'static> Drop for LiveChart<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn with_live_state<S, R>(
    weak: &Weak<RefCell<Option<ChartState<S>>>>,
    f: impl FnOnce(&mut ChartState<S>) -> R,
) -> Option<R> {
    let rc = weak.upgrade()?;
    let mut guard = rc.borrow_mut();
    guard.as_mut().map(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::IndicatorPoint;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        AddCandles,
        AddVolume(VolumeScale),
        AddLine(&'static str),
        SetCandles(usize),
        UpdateCandle(Bar),
        SetVolume(Vec<VolumePoint>),
        SetLine(usize, usize),
        Width(f32),
        Fit,
        Remove,
    }

    #[derive(Default, Clone)]
    struct RecordingSurface {
        calls: Rc<RefCell<Vec<Call>>>,
        lines: usize,
    }

    impl RecordingSurface {
        fn push(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl ChartSurface for RecordingSurface {
        fn add_candle_series(&mut self, _style: CandleStyle) {
            self.push(Call::AddCandles);
        }
        fn add_volume_series(&mut self, scale: VolumeScale) {
            self.push(Call::AddVolume(scale));
        }
        fn add_line_series(&mut self, style: LineStyle) -> usize {
            self.push(Call::AddLine(style.spec.name));
            self.lines += 1;
            self.lines - 1
        }
        fn set_candle_data(&mut self, bars: &[Bar]) {
            self.push(Call::SetCandles(bars.len()));
        }
        fn update_candle(&mut self, bar: Bar) {
            self.push(Call::UpdateCandle(bar));
        }
        fn set_volume_data(&mut self, points: &[VolumePoint]) {
            self.push(Call::SetVolume(points.to_vec()));
        }
        fn set_line_data(&mut self, series: usize, points: &[IndicatorPoint]) {
            self.push(Call::SetLine(series, points.len()));
        }
        fn apply_width(&mut self, width: f32) {
            self.push(Call::Width(width));
        }
        fn fit_content(&mut self) {
            self.push(Call::Fit);
        }
        fn remove(&mut self) {
            self.push(Call::Remove);
        }
    }

    fn bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                Bar::new(1_700_000_000 + i as i64 * 86_400, c - 0.5, c + 1.0, c - 1.0, c, 1_000.0)
            })
            .collect()
    }

    fn mount() -> (LiveChart<RecordingSurface>, Rc<RefCell<Vec<Call>>>, ChartEvents) {
        let surface = RecordingSurface::default();
        let calls = surface.calls.clone();
        let events = ChartEvents::default();
        let chart = LiveChart::mount(surface, &events, 800.0, None);
        (chart, calls, events)
    }

    #[test]
    fn mount_creates_series_and_applies_width() {
        let (_chart, calls, _events) = mount();
        assert_eq!(
            *calls.borrow(),
            vec![
                Call::AddCandles,
                Call::AddVolume(VolumeScale {
                    margin_top: 0.8,
                    margin_bottom: 0.0
                }),
                Call::AddLine("SMA 20"),
                Call::AddLine("SMA 50"),
                Call::AddLine("EMA 200"),
                Call::Width(800.0),
            ]
        );
    }

    #[test]
    fn bar_change_replaces_everything_then_fits() {
        let (mut chart, calls, _events) = mount();
        calls.borrow_mut().clear();

        chart.set_bars(bars(60));

        let log = calls.borrow();
        assert_eq!(log[0], Call::SetCandles(60));
        assert!(matches!(&log[1], Call::SetVolume(v) if v.len() == 60));
        assert_eq!(log[2], Call::SetLine(0, 41));
        assert_eq!(log[3], Call::SetLine(1, 11));
        assert_eq!(log[4], Call::SetLine(2, 0));
        assert_eq!(log[5], Call::Fit);
        assert_eq!(log.len(), 6);
    }

    #[test]
    fn volume_colour_follows_candle_direction() {
        let (mut chart, calls, _events) = mount();
        let up = Bar::new(1, 10.0, 12.0, 9.0, 11.0, 5.0);
        let down = Bar::new(2, 11.0, 12.0, 9.0, 10.0, 7.0);
        chart.set_bars(vec![up, down]);

        let log = calls.borrow();
        let volume = log
            .iter()
            .find_map(|c| match c {
                Call::SetVolume(v) => Some(v.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(volume[0].color, CHART.volume_up_color);
        assert_eq!(volume[1].color, CHART.volume_down_color);
        assert_eq!(volume[1].value, 7.0);
    }

    #[test]
    fn live_tick_patches_only_the_last_candle() {
        let (mut chart, calls, _events) = mount();
        let history = bars(30);
        chart.set_bars(history.clone());
        let overlays_before = chart.overlays();
        calls.borrow_mut().clear();

        assert!(chart.apply_live_price(500.0));

        let last = history[29];
        let expected = Bar::new(last.time, last.open, 500.0, last.low, 500.0, last.volume);
        assert_eq!(*calls.borrow(), vec![Call::UpdateCandle(expected)]);
        assert_eq!(chart.displayed_last(), Some(expected));
        assert_eq!(chart.bars(), history, "fetched bars are never mutated");
        assert_eq!(chart.overlays(), overlays_before);
    }

    #[test]
    fn each_tick_is_derived_from_the_fetched_bar() {
        let (mut chart, _calls, _events) = mount();
        chart.set_bars(bars(3));
        let last = chart.bars()[2];

        chart.apply_live_price(last.high + 10.0);
        chart.apply_live_price(last.low - 5.0);

        let shown = chart.displayed_last().unwrap();
        assert_eq!(shown.high, last.high);
        assert_eq!(shown.low, last.low - 5.0);
        assert_eq!(shown.close, last.low - 5.0);
    }

    #[test]
    fn live_tick_without_bars_is_ignored() {
        let (mut chart, calls, _events) = mount();
        calls.borrow_mut().clear();

        assert!(!chart.apply_live_price(123.0));
        assert!(calls.borrow().is_empty());
        assert!(chart.bars().is_empty());
        assert_eq!(chart.displayed_last(), None);
    }

    #[test]
    fn unusable_prices_are_ignored() {
        let (mut chart, calls, _events) = mount();
        chart.set_bars(bars(2));
        calls.borrow_mut().clear();

        assert!(!chart.apply_live_price(0.0));
        assert!(!chart.apply_live_price(f64::NAN));
        assert!(!chart.apply_tick(&LiveTick::new("AAPL", -3.0)));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn empty_history_makes_no_series_calls() {
        let (mut chart, calls, _events) = mount();
        chart.set_bars(bars(5));
        calls.borrow_mut().clear();

        chart.set_bars(Vec::new());
        assert!(calls.borrow().is_empty());
        assert!(!chart.apply_live_price(10.0));
    }

    #[test]
    fn stale_generation_is_dropped() {
        let (mut chart, calls, _events) = mount();
        let first = chart.begin_request();
        let second = chart.begin_request();
        calls.borrow_mut().clear();

        assert!(!chart.apply_history(first, bars(3)));
        assert!(calls.borrow().is_empty());
        assert!(chart.apply_history(second, bars(3)));
        assert!(second > first);
    }

    #[test]
    fn resize_is_forwarded_until_teardown() {
        let (mut chart, calls, events) = mount();
        calls.borrow_mut().clear();

        events.resize.emit(&640.0);
        events.resize.emit(&640.0);
        assert_eq!(*calls.borrow(), vec![Call::Width(640.0), Call::Width(640.0)]);

        chart.teardown();
        assert_eq!(events.resize.listener_count(), 0);
        events.resize.emit(&320.0);
        assert_eq!(calls.borrow().last(), Some(&Call::Remove));
    }

    #[test]
    fn teardown_turns_every_entry_point_into_a_no_op() {
        let (mut chart, calls, _events) = mount();
        let generation = chart.begin_request();
        chart.teardown();
        calls.borrow_mut().clear();

        assert!(!chart.apply_history(generation, bars(3)));
        chart.set_bars(bars(3));
        assert!(!chart.apply_live_price(10.0));
        chart.teardown();

        assert!(calls.borrow().is_empty());
        assert!(!chart.is_mounted());
        assert_eq!(chart.with_surface(|_| ()), None);
    }

    #[test]
    fn dropping_the_chart_removes_the_surface() {
        let (chart, calls, events) = mount();
        drop(chart);
        assert_eq!(calls.borrow().last(), Some(&Call::Remove));
        assert_eq!(events.resize.listener_count(), 0);
    }

    #[test]
    fn crosshair_reports_the_displayed_candle_under_the_pointer() {
        let surface = RecordingSurface::default();
        let events = ChartEvents::default();
        let seen: Rc<RefCell<Vec<CrosshairOhlc>>> = Rc::default();
        let hits = Rc::new(Cell::new(0));

        let sink = seen.clone();
        let count = hits.clone();
        let mut chart = LiveChart::mount(
            surface,
            &events,
            500.0,
            Some(Box::new(move |ohlc| {
                count.set(count.get() + 1);
                sink.borrow_mut().push(ohlc);
            })),
        );
        let history = bars(3);
        chart.set_bars(history.clone());
        chart.apply_live_price(250.0);

        events.crosshair.emit(&CrosshairMove { time: Some(history[0].time) });
        events.crosshair.emit(&CrosshairMove { time: Some(history[2].time) });
        events.crosshair.emit(&CrosshairMove { time: Some(42) });
        events.crosshair.emit(&CrosshairMove { time: None });

        assert_eq!(hits.get(), 2);
        let seen = seen.borrow();
        assert_eq!(seen[0], CrosshairOhlc::from(&history[0]));
        assert_eq!(seen[1].close, 250.0);
        assert_eq!(seen[1].high, 250.0);
    }
}
