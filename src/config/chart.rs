//! Live chart visual configuration

use eframe::egui::Color32;

use crate::analysis::{OverlayKind, OverlaySpec};

pub struct OverlayStyle {
    pub spec: OverlaySpec,
    pub color: Color32,
    pub line_width: f32,
}

pub struct ChartConfig {
    pub height: f32,
    pub background_color: Color32,
    pub text_color: Color32,
    pub grid_color: Color32,
    pub border_color: Color32,

    // --- CANDLESTICKS ---
    pub candle_up_color: Color32,
    pub candle_down_color: Color32,
    pub candle_width_pct: f64, // 0.0 to 1.0 (relative to time step)
    pub candle_wick_width: f32,

    // --- VOLUME ---
    pub volume_up_color: Color32,
    pub volume_down_color: Color32,
    /// Volume lives on its own hidden scale squeezed into the bottom of the plot.
    pub volume_scale_margin_top: f64,
    pub volume_scale_margin_bottom: f64,

    // --- OVERLAYS ---
    pub overlays: [OverlayStyle; 3],

    pub plot_y_padding_pct: f64,
}

pub const CHART: ChartConfig = ChartConfig {
    height: 460.0,
    background_color: Color32::from_rgb(11, 18, 32), // #0b1220
    text_color: Color32::from_rgb(203, 213, 225),    // #cbd5e1
    grid_color: Color32::from_rgba_premultiplied(12, 13, 15, 20),
    border_color: Color32::from_rgba_premultiplied(37, 41, 47, 64),

    candle_up_color: Color32::from_rgb(34, 197, 94),  // #22c55e
    candle_down_color: Color32::from_rgb(239, 68, 68), // #ef4444
    candle_width_pct: 0.8,
    candle_wick_width: 1.0,

    // rgba(34,197,94,0.6) / rgba(239,68,68,0.6)
    volume_up_color: Color32::from_rgba_premultiplied(20, 118, 56, 153),
    volume_down_color: Color32::from_rgba_premultiplied(143, 41, 41, 153),
    volume_scale_margin_top: 0.8,
    volume_scale_margin_bottom: 0.0,

    overlays: [
        OverlayStyle {
            spec: OverlaySpec::new("SMA 20", OverlayKind::Sma, 20),
            color: Color32::from_rgb(96, 165, 250), // #60a5fa
            line_width: 2.0,
        },
        OverlayStyle {
            spec: OverlaySpec::new("SMA 50", OverlayKind::Sma, 50),
            color: Color32::from_rgb(245, 158, 11), // #f59e0b
            line_width: 2.0,
        },
        OverlayStyle {
            spec: OverlaySpec::new("EMA 200", OverlayKind::Ema, 200),
            color: Color32::from_rgb(167, 139, 250), // #a78bfa
            line_width: 2.0,
        },
    ],

    plot_y_padding_pct: 0.02,
};

impl ChartConfig {
    pub fn overlay_specs(&self) -> [OverlaySpec; 3] {
        [
            self.overlays[0].spec,
            self.overlays[1].spec,
            self.overlays[2].spec,
        ]
    }
}
