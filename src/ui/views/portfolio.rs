use eframe::egui::{Button, RichText, ScrollArea, Spinner, Ui};

use crate::app::{PortfolioPage, Route};
use crate::models::{Asset, PortfolioTotals};
use crate::ui::styles::{UiStyleExt, get_pnl_color};
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::{format_price, format_signed_usd};
use crate::ui::view_model::ViewModel;
use crate::ui::views::ViewAction;

pub(crate) fn show_portfolio(
    ui: &mut Ui,
    vm: &ViewModel,
    page: &PortfolioPage,
) -> Option<ViewAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new(&UI_TEXT.portfolio_heading).color(vm.palette.heading));
        if ui.button(UI_TEXT.label_refresh.as_str()).clicked() {
            action = Some(ViewAction::RefreshPortfolio);
        }
        if page.assets.loading || page.summary.loading {
            ui.add(Spinner::new());
        }
    });
    if let Some(err) = page.assets.error.as_ref().or(page.summary.error.as_ref()) {
        ui.label_error(err.to_string());
    }
    ui.add_space(8.0);

    let assets: &[Asset] = page.assets.data.as_deref().unwrap_or_default();
    totals_row(ui, &PortfolioTotals::from_assets(assets));

    if let Some(summary) = &page.summary.data {
        let mut extra: Vec<_> = summary.extra.iter().collect();
        extra.sort_by(|a, b| a.0.cmp(b.0));
        if !extra.is_empty() {
            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                for (key, value) in extra {
                    ui.label_subdued(format!("{}: {}", key, value));
                }
            });
        }
    }
    ui.add_space(12.0);

    ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for asset in assets {
                if asset_card(ui, asset) {
                    action = Some(ViewAction::Navigate(Route::Stock(asset.symbol.clone())));
                }
            }
        });
    });

    action
}

fn totals_row(ui: &mut Ui, totals: &PortfolioTotals) {
    ui.horizontal(|ui| {
        for (label, value, color) in [
            (&UI_TEXT.portfolio_total_invested, format_price(totals.invested), UI_CONFIG.colors.heading),
            (&UI_TEXT.portfolio_total_value, format_price(totals.value), UI_CONFIG.colors.heading),
            (&UI_TEXT.portfolio_total_pnl, format_signed_usd(totals.pnl), get_pnl_color(totals.pnl)),
        ] {
            UI_CONFIG.card_frame().show(ui, |ui| {
                ui.set_min_width(UI_CONFIG.card_min_width);
                ui.label_subheader(label);
                ui.label(RichText::new(value).size(22.0).strong().color(color));
            });
        }
    });
}

/// Returns true when "View Details" was clicked.
fn asset_card(ui: &mut Ui, asset: &Asset) -> bool {
    UI_CONFIG
        .card_frame()
        .show(ui, |ui| {
            ui.set_min_width(UI_CONFIG.card_min_width);
            ui.label(RichText::new(asset.display_name()).strong().color(UI_CONFIG.colors.heading));
            ui.label_subdued(&asset.symbol);
            ui.add_space(4.0);

            if let Some(qty) = asset.quantity {
                ui.metric(&UI_TEXT.tx_col_quantity, &format!("{}", qty), UI_CONFIG.colors.label);
            }
            let invested = asset.invested.unwrap_or(0.0);
            let current = asset.current_value.unwrap_or(0.0);
            let pnl = asset.pnl.unwrap_or(current - invested);
            ui.metric(&UI_TEXT.portfolio_invested, &format_price(invested), UI_CONFIG.colors.label);
            ui.metric(&UI_TEXT.portfolio_current, &format_price(current), UI_CONFIG.colors.label);
            ui.metric(&UI_TEXT.portfolio_pnl, &format_signed_usd(pnl), get_pnl_color(pnl));

            ui.add_space(6.0);
            ui.add(Button::new(UI_TEXT.portfolio_view_details.as_str())).clicked()
        })
        .inner
}
