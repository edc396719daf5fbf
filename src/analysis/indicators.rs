//! Moving-average overlays computed from a full bar sequence.
//!
//! Both indicators are pure: every call starts from scratch, nothing is carried
//! between calls, so the chart simply recomputes whenever the history changes.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Sma,
    Ema,
}

/// Named moving-average definition drawn on top of the candles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlaySpec {
    pub name: &'static str,
    pub kind: OverlayKind,
    pub period: usize,
}

impl OverlaySpec {
    pub const fn new(name: &'static str, kind: OverlayKind, period: usize) -> Self {
        Self { name, kind, period }
    }

    pub fn compute(&self, bars: &[Bar]) -> Vec<IndicatorPoint> {
        match self.kind {
            OverlayKind::Sma => sma(bars, self.period),
            OverlayKind::Ema => ema(bars, self.period),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySeries {
    pub spec: OverlaySpec,
    pub points: Vec<IndicatorPoint>,
}

/// Simple moving average of closes. Emits nothing until a full window exists.
pub fn sma(bars: &[Bar], period: usize) -> Vec<IndicatorPoint> {
    if period == 0 || bars.len() < period {
        return Vec::new();
    }

    // Each window is summed afresh, no rolling sum.
    bars.windows(period)
        .map(|window| {
            let sum: f64 = window.iter().map(|b| b.close).sum();
            IndicatorPoint {
                time: window[period - 1].time,
                value: sum / period as f64,
            }
        })
        .collect()
}

/// Exponential moving average seeded with the first close.
///
/// The recurrence runs from index 0 (so `ema_0 == close_0`) and is never reset;
/// only indices `>= period - 1` are emitted. Values therefore depend on every
/// close before the emitted window as well.
pub fn ema(bars: &[Bar], period: usize) -> Vec<IndicatorPoint> {
    if period == 0 || bars.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(bars.len() - period + 1);
    let mut ema_prev = bars[0].close;

    for (i, bar) in bars.iter().enumerate() {
        let ema = bar.close * k + ema_prev * (1.0 - k);
        ema_prev = ema;

        if i + 1 >= period {
            out.push(IndicatorPoint {
                time: bar.time,
                value: ema,
            });
        }
    }
    out
}

/// One series per overlay, in the order given.
pub fn compute_overlays(bars: &[Bar], specs: &[OverlaySpec]) -> Vec<OverlaySeries> {
    specs
        .iter()
        .map(|spec| OverlaySeries {
            spec: *spec,
            points: spec.compute(bars),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(1_000 + i as i64 * 60, c, c, c, c, 0.0))
            .collect()
    }

    fn values(points: &[IndicatorPoint]) -> Vec<f64> {
        points.iter().map(|p| p.value).collect()
    }

    #[test]
    fn sma_window_matches_arithmetic_mean() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let out = sma(&bars, 3);

        assert_eq!(values(&out), vec![2.0, 3.0, 4.0]);
        let times: Vec<i64> = out.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![bars[2].time, bars[3].time, bars[4].time]);
    }

    #[test]
    fn sma_is_empty_when_series_shorter_than_period() {
        let bars = bars_from_closes(&[1.0, 2.0]);
        assert!(sma(&bars, 3).is_empty());
        assert!(sma(&bars, 0).is_empty());
    }

    #[test]
    fn ema_seeds_from_first_close_and_warms_up_from_index_zero() {
        let bars = bars_from_closes(&[10.0, 20.0, 10.0, 20.0, 10.0]);
        let out = ema(&bars, 2);

        assert_eq!(out.len(), 4);
        assert_eq!(out[0].time, bars[1].time);
        // 20 * 2/3 + 10 * 1/3, not the plain two-bar average of 15
        assert!((out[0].value - 50.0 / 3.0).abs() < 1e-9);

        let k = 2.0 / 3.0;
        let e2 = 10.0 * k + out[0].value * (1.0 - k);
        assert!((out[1].value - e2).abs() < 1e-9);
    }

    #[test]
    fn ema_depends_on_closes_before_the_emitted_window() {
        let a = bars_from_closes(&[100.0, 1.0, 1.0, 1.0]);
        let b = bars_from_closes(&[1.0, 1.0, 1.0, 1.0]);

        let ea = ema(&a, 3);
        let eb = ema(&b, 3);
        assert_eq!(ea.len(), 2);
        assert!(ea[0].value > eb[0].value);
        assert!((eb[0].value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn overlays_follow_spec_order() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0]);
        let specs = [
            OverlaySpec::new("EMA 2", OverlayKind::Ema, 2),
            OverlaySpec::new("SMA 3", OverlayKind::Sma, 3),
            OverlaySpec::new("SMA 9", OverlayKind::Sma, 9),
        ];
        let out = compute_overlays(&bars, &specs);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].spec.name, "EMA 2");
        assert_eq!(out[0].points.len(), 3);
        assert_eq!(values(&out[1].points), vec![2.0, 3.0]);
        assert!(out[2].points.is_empty());
    }
}
