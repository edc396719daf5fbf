use eframe::egui::{FontId, RichText, ScrollArea, Spinner, TextEdit, Ui};

use crate::app::{Route, SearchPage, should_search};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::view_model::ViewModel;
use crate::ui::views::ViewAction;

pub(crate) fn show_search(ui: &mut Ui, vm: &ViewModel, page: &mut SearchPage) -> Option<ViewAction> {
    let mut action = None;

    ui.heading(RichText::new(&UI_TEXT.app_tagline).color(vm.palette.heading));
    ui.add_space(8.0);

    let response = ui.add(
        TextEdit::singleline(&mut page.query)
            .hint_text(&UI_TEXT.search_hint)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        let query = page.query.trim();
        if should_search(query) && query != page.results_for {
            action = Some(ViewAction::Search(query.to_string()));
        }
    }

    if !should_search(&page.query) {
        return action;
    }

    ui.add_space(8.0);
    if page.results.loading {
        ui.add(Spinner::new());
    }
    if let Some(err) = &page.results.error {
        ui.label_error(err.to_string());
    }

    let Some(quotes) = &page.results.data else {
        return action;
    };
    if quotes.is_empty() && !page.results.loading {
        ui.label_subdued(&UI_TEXT.search_no_results);
        return action;
    }

    ScrollArea::vertical().show(ui, |ui| {
        for quote in quotes {
            ui.horizontal(|ui| {
                let clicked = ui
                    .interactive_label(
                        &quote.symbol,
                        false,
                        vm.palette.accent,
                        FontId::monospace(15.0),
                    )
                    .clicked();
                ui.label(quote.label());
                if let Some(exchange) = &quote.exchange {
                    ui.label_subdued(exchange);
                }
                if let Some(kind) = &quote.quote_type {
                    ui.label_subdued(kind);
                }
                if clicked {
                    action = Some(ViewAction::Navigate(Route::Stock(quote.symbol.clone())));
                }
            });
        }
    });

    action
}
