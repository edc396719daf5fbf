use eframe::egui::{Context, Visuals};

use crate::ui::UI_CONFIG;

/// Dollar price with two decimals, or four below one dollar.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "-".to_string();
    }
    if price.abs() < 1.0 && price != 0.0 {
        format!("${:.4}", price)
    } else {
        format!("${:.2}", price)
    }
}

/// Signed dollar amount, e.g. `-$12.50`.
pub fn format_signed_usd(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

/// Whole number with thousands separators (`2,912,345,000`).
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = value.round() as i128;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

/// Sets up custom visuals for the entire application
pub fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();

    visuals.window_fill = UI_CONFIG.colors.side_panel;
    visuals.panel_fill = UI_CONFIG.colors.central_panel;

    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.selection.bg_fill = UI_CONFIG.colors.accent;

    ctx.set_visuals(visuals);
    ctx.style_mut(|s| s.interaction.selectable_labels = false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_use_cents_above_a_dollar() {
        assert_eq!(format_price(189.456), "$189.46");
        assert_eq!(format_price(0.12345), "$0.1235");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(f64::NAN), "-");
    }

    #[test]
    fn signed_amounts() {
        assert_eq!(format_signed_usd(-12.5), "-$12.50");
        assert_eq!(format_signed_usd(3.0), "$3.00");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(2_912_345_000.0), "2,912,345,000");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.4), "1,000");
        assert_eq!(format_thousands(-1234567.0), "-1,234,567");
    }
}
