use eframe::egui::{Color32, CornerRadius, Frame, Margin, Stroke};

pub use crate::ui::ui_text::UI_TEXT;

/// UI Colors for consistent theming
#[derive(Debug, Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub accent: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub card: Color32,
    pub profit: Color32,
    pub loss: Color32,
    pub buy: Color32,
    pub sell: Color32,
    pub error: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub chat_window_width: f32,
    pub card_min_width: f32,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::from_rgb(203, 213, 225),
        heading: Color32::WHITE,
        subsection_heading: Color32::from_rgb(148, 163, 184),
        accent: Color32::from_rgb(102, 126, 234), // #667eea
        central_panel: Color32::from_rgb(15, 23, 42),
        side_panel: Color32::from_rgb(35, 42, 54), // #232a36
        card: Color32::from_rgb(30, 41, 59),
        profit: Color32::from_rgb(76, 175, 80), // #4caf50
        loss: Color32::from_rgb(244, 67, 54),   // #f44336
        buy: Color32::from_rgb(17, 153, 142),   // #11998e
        sell: Color32::from_rgb(252, 92, 125),  // #fc5c7d
        error: Color32::from_rgb(239, 68, 68),
    },
    chat_window_width: 360.0,
    card_min_width: 220.0,
};

impl UiConfig {
    /// Frame for the top navigation bar
    pub fn top_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(8),
            ..Default::default()
        }
    }

    /// Frame for Bottom Status bar (Tighter vertical padding)
    pub fn bottom_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.side_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::symmetric(8, 4),
            ..Default::default()
        }
    }

    pub fn central_panel_frame(&self) -> Frame {
        Frame {
            fill: self.colors.central_panel,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(16),
            ..Default::default()
        }
    }

    /// Metric and asset cards
    pub fn card_frame(&self) -> Frame {
        Frame {
            fill: self.colors.card,
            stroke: Stroke::NONE,
            inner_margin: Margin::same(12),
            corner_radius: CornerRadius::same(8),
            ..Default::default()
        }
    }
}
