use eframe::egui::{Button, DragValue, Grid, RichText, Slider, Spinner, Ui};

use crate::app::{OptimizationPage, Route};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::format_price;
use crate::ui::view_model::ViewModel;
use crate::ui::views::ViewAction;

pub(crate) fn show_optimization(
    ui: &mut Ui,
    vm: &ViewModel,
    page: &mut OptimizationPage,
) -> Option<ViewAction> {
    let mut action = None;

    ui.heading(RichText::new(&UI_TEXT.opt_heading).color(vm.palette.heading));
    ui.add_space(8.0);

    UI_CONFIG.card_frame().show(ui, |ui| {
        Grid::new("opt_inputs").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
            ui.label_subheader(&UI_TEXT.opt_budget);
            ui.add(
                DragValue::new(&mut page.budget)
                    .range(0.0..=f64::MAX)
                    .speed(100.0)
                    .prefix("$"),
            );
            ui.end_row();

            ui.label_subheader(&UI_TEXT.opt_risk);
            ui.add(Slider::new(&mut page.risk_factor, 0.0..=1.0).step_by(0.1));
            ui.end_row();
        });
        ui.label_subdued(&UI_TEXT.opt_risk_hint);
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            let running = page.result.loading;
            let label = if running {
                UI_TEXT.opt_running.as_str()
            } else {
                UI_TEXT.opt_run.as_str()
            };
            if ui.add_enabled(!running, Button::new(label)).clicked() {
                action = Some(ViewAction::Optimize {
                    budget: page.budget.max(0.0),
                    risk_factor: page.risk_factor.clamp(0.0, 1.0),
                });
            }
            if running {
                ui.add(Spinner::new());
            }
        });
    });

    if let Some(err) = &page.result.error {
        ui.label_error(err.to_string());
    }

    let Some(result) = &page.result.data else {
        return action;
    };

    ui.add_space(12.0);
    ui.label_subheader(&UI_TEXT.opt_results);

    let mut total = 0.0;
    Grid::new("opt_results").striped(true).num_columns(2).show(ui, |ui| {
        for (symbol, alloc) in result.selected() {
            let value = alloc.display_value();
            total += value;
            if ui.link(RichText::new(symbol).strong()).clicked() {
                action = Some(ViewAction::Navigate(Route::Stock(symbol.to_string())));
            }
            ui.label(format_price(value));
            ui.end_row();
        }
    });
    ui.metric(&UI_TEXT.opt_current_value, &format_price(total), vm.palette.accent);

    action
}
