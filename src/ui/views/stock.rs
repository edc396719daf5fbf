use eframe::egui::{Align, Layout, RichText, Spinner, Ui};
use strum::IntoEnumIterator;

use crate::app::StockPage;
use crate::chart::{CrosshairMove, CrosshairOhlc};
use crate::config::chart::CHART;
use crate::domain::Timeframe;
use crate::ui::styles::{UiStyleExt, colored_subsection_heading, connection_badge};
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::{format_price, format_thousands};
use crate::ui::view_model::ViewModel;
use crate::ui::views::ViewAction;
use crate::utils::epoch_sec_to_label;

pub(crate) fn show_stock(ui: &mut Ui, vm: &ViewModel, page: &mut StockPage) -> Option<ViewAction> {
    let mut action = None;

    let title = page
        .info
        .data
        .as_ref()
        .and_then(|i| i.short_name.clone().or_else(|| i.long_name.clone()))
        .unwrap_or_else(|| page.symbol.clone());
    ui.horizontal(|ui| {
        ui.heading(RichText::new(title).strong().color(vm.palette.heading));
        ui.label_subdued(format!("({})", page.symbol));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.label(connection_badge(vm.connection));
        });
    });
    ui.add_space(8.0);

    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.set_width(UI_CONFIG.card_min_width);
            details_card(ui, vm, page);
        });
        ui.vertical(|ui| {
            if let Some(tf) = timeframe_bar(ui, page.timeframe) {
                action = Some(ViewAction::SetTimeframe(tf));
            }
            chart_area(ui, page);
        });
    });

    action
}

fn details_card(ui: &mut Ui, vm: &ViewModel, page: &StockPage) {
    UI_CONFIG.card_frame().show(ui, |ui| {
        ui.set_min_width(UI_CONFIG.card_min_width);

        if page.info.loading && page.info.data.is_none() {
            ui.add(Spinner::new());
            ui.label_subdued(&UI_TEXT.stock_loading);
        }
        if let Some(err) = &page.info.error {
            ui.label_error(err.to_string());
        }

        let info = page.info.data.clone().unwrap_or_default();
        let na = || UI_TEXT.label_na.clone();

        ui.label_subheader(&UI_TEXT.stock_sector);
        ui.label(RichText::new(info.sector.unwrap_or_else(na)).strong());
        ui.add_space(6.0);

        ui.label_subheader(&UI_TEXT.stock_market_cap);
        ui.label(
            RichText::new(info.market_cap.map(format_thousands).unwrap_or_else(na)).strong(),
        );
        ui.add_space(6.0);

        ui.label_subheader(&UI_TEXT.stock_pe);
        ui.label(
            RichText::new(
                info.trailing_pe
                    .map(|pe| format!("{:.2}", pe))
                    .unwrap_or_else(na),
            )
            .strong(),
        );
        ui.add_space(12.0);

        ui.label(colored_subsection_heading(&UI_TEXT.stock_live_price));
        ui.label(
            RichText::new(format_price(page.display_price().unwrap_or(0.0)))
                .size(26.0)
                .strong()
                .color(vm.palette.accent),
        );
    });
}

fn timeframe_bar(ui: &mut Ui, current: Timeframe) -> Option<Timeframe> {
    let mut picked = None;
    ui.horizontal_wrapped(|ui| {
        for tf in Timeframe::iter() {
            if ui.selectable_label(tf == current, tf.label()).clicked() && tf != current {
                picked = Some(tf);
            }
        }
    });
    picked
}

fn chart_area(ui: &mut Ui, page: &mut StockPage) {
    if page.history.loading {
        ui.horizontal(|ui| {
            ui.add(Spinner::new());
            ui.label_subdued(&UI_TEXT.stock_loading);
        });
    }
    if let Some(err) = &page.history.error {
        ui.label_error(err.to_string());
    }
    if !page.history.loading && page.chart.displayed_last().is_none() {
        ui.label_subdued(&UI_TEXT.stock_no_history);
    }

    let Some(frame) = page.chart.with_surface(|surface| surface.show(ui)) else {
        return;
    };

    // Surface borrow is released; container events can reach the chart now.
    if (frame.available_width - page.last_width).abs() > 0.5 {
        page.last_width = frame.available_width;
        page.events.resize.emit(&frame.available_width);
    }
    *page.crosshair.borrow_mut() = None;
    page.events.crosshair.emit(&CrosshairMove {
        time: frame.pointer_time,
    });

    let hovered = *page.crosshair.borrow();
    let readout = hovered.or_else(|| page.chart.displayed_last().map(|b| CrosshairOhlc::from(&b)));
    if let Some(ohlc) = readout {
        ohlc_readout(ui, &ohlc, page.timeframe.is_intraday());
    }
}

fn ohlc_readout(ui: &mut Ui, ohlc: &CrosshairOhlc, with_time: bool) {
    ui.horizontal(|ui| {
        ui.label_subdued(epoch_sec_to_label(ohlc.time, with_time));
        let color = if ohlc.close >= ohlc.open {
            CHART.candle_up_color
        } else {
            CHART.candle_down_color
        };
        for (label, value) in [
            (&UI_TEXT.chart_ohlc_open, ohlc.open),
            (&UI_TEXT.chart_ohlc_high, ohlc.high),
            (&UI_TEXT.chart_ohlc_low, ohlc.low),
            (&UI_TEXT.chart_ohlc_close, ohlc.close),
        ] {
            ui.metric(label, &format_price(value), color);
        }
    });
}
