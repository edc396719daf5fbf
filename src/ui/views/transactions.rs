use eframe::egui::{
    Align, Button, ComboBox, Context, DragValue, Id, Layout, RichText, Sense, Spinner, TextEdit, Ui,
    Window,
};
use egui_extras::{Column, TableBuilder};

use crate::app::TransactionsPage;
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::ui::styles::{DirectionColor, UiStyleExt};
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::format_price;
use crate::ui::view_model::ViewModel;
use crate::ui::views::ViewAction;
use crate::utils::{TimeUtils, epoch_sec_to_label};

pub(crate) fn show_transactions(
    ui: &mut Ui,
    vm: &ViewModel,
    page: &mut TransactionsPage,
) -> Option<ViewAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new(&UI_TEXT.tx_heading).color(vm.palette.heading));
        if ui.button(UI_TEXT.label_refresh.as_str()).clicked() {
            action = Some(ViewAction::RefreshTransactions);
        }
        if page.list.loading {
            ui.add(Spinner::new());
        }
    });
    if let Some(err) = page.list.error.as_ref().or(page.action_error.as_ref()) {
        ui.label_error(err.to_string());
    }
    ui.add_space(8.0);

    if let Some(new_tx) = new_transaction_form(ui, page) {
        action = Some(ViewAction::CreateTransaction(new_tx));
    }
    ui.add_space(8.0);

    let rows: &[Transaction] = page.list.data.as_deref().unwrap_or_default();
    let mut clicked: Option<Transaction> = None;

    TableBuilder::new(ui)
        .striped(true)
        .sense(Sense::click())
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::remainder())
        .header(24.0, |mut header| {
            for title in [
                &UI_TEXT.tx_col_symbol,
                &UI_TEXT.tx_col_type,
                &UI_TEXT.tx_col_quantity,
                &UI_TEXT.tx_col_price,
                &UI_TEXT.tx_col_date,
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for tx in rows {
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        ui.label(RichText::new(tx.symbol()).strong());
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(tx.kind.to_string()).strong().color(tx.kind.color()));
                    });
                    row.col(|ui| {
                        ui.label(format!("{}", tx.quantity));
                    });
                    row.col(|ui| {
                        ui.label(price_label(tx.price));
                    });
                    row.col(|ui| {
                        ui.label(date_label(tx.transaction_date.as_deref(), false));
                    });
                    if row.response().clicked() {
                        clicked = Some(tx.clone());
                    }
                });
            }
        });

    if clicked.is_some() {
        page.selected = clicked;
    }

    if let Some(id) = details_window(ui.ctx(), &mut page.selected) {
        action = Some(ViewAction::DeleteTransaction(id));
    }

    action
}

fn new_transaction_form(ui: &mut Ui, page: &mut TransactionsPage) -> Option<NewTransaction> {
    let form = &mut page.form;
    let mut submitted = None;

    ui.horizontal(|ui| {
        ui.add(
            TextEdit::singleline(&mut form.symbol)
                .hint_text(&UI_TEXT.tx_col_symbol)
                .desired_width(90.0),
        );
        ComboBox::from_id_salt("new_tx_type")
            .selected_text(if form.buy {
                TransactionType::Buy.to_string()
            } else {
                TransactionType::Sell.to_string()
            })
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut form.buy, true, TransactionType::Buy.to_string());
                ui.selectable_value(&mut form.buy, false, TransactionType::Sell.to_string());
            });
        ui.label_subdued(&UI_TEXT.tx_col_quantity);
        ui.add(DragValue::new(&mut form.quantity).range(0.0..=f64::MAX).speed(1.0));
        ui.label_subdued(&UI_TEXT.tx_col_price);
        ui.add(
            DragValue::new(&mut form.price)
                .range(0.0..=f64::MAX)
                .speed(0.1)
                .prefix("$"),
        );

        let valid = !form.symbol.trim().is_empty() && form.quantity > 0.0 && form.price > 0.0;
        if ui.add_enabled(valid, Button::new(UI_TEXT.tx_add.as_str())).clicked() {
            submitted = Some(NewTransaction {
                symbol: form.symbol.trim().to_ascii_uppercase(),
                kind: if form.buy {
                    TransactionType::Buy
                } else {
                    TransactionType::Sell
                },
                quantity: form.quantity,
                price: form.price,
            });
        }
    });

    submitted
}

/// Returns the id to delete when the delete button was pressed.
fn details_window(ctx: &Context, selected: &mut Option<Transaction>) -> Option<i64> {
    let tx = selected.as_ref()?.clone();
    let mut open = true;
    let mut close = false;
    let mut delete = None;

    let title = tx
        .asset
        .as_ref()
        .map(|a| a.display_name().to_string())
        .unwrap_or_else(|| UI_TEXT.tx_details_title.clone());

    Window::new(title)
        .id(Id::new("tx_details"))
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .default_width(360.0)
        .show(ctx, |ui| {
            let text = ui.visuals().text_color();
            ui.label_subdued(tx.symbol());
            ui.separator();
            ui.metric(&UI_TEXT.tx_col_type, &tx.kind.to_string(), tx.kind.color());
            ui.metric(&UI_TEXT.tx_col_quantity, &format!("{}", tx.quantity), text);
            ui.metric(&UI_TEXT.tx_col_price, &price_label(tx.price), text);
            ui.metric(
                &UI_TEXT.tx_col_date,
                &date_label(tx.transaction_date.as_deref(), true),
                text,
            );

            if let Some(asset) = &tx.asset {
                ui.separator();
                ui.label_subheader(&UI_TEXT.tx_company_info);
                ui.label(asset.display_name());
                ui.label(asset.description.as_deref().unwrap_or(&UI_TEXT.tx_no_description));
                let na = UI_TEXT.label_na.as_str();
                ui.label_subdued(format!("Exchange: {}", asset.exchange.as_deref().unwrap_or(na)));
                ui.label_subdued(format!("Sector: {}", asset.sector.as_deref().unwrap_or(na)));
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button(UI_TEXT.tx_delete.as_str()).clicked() {
                    delete = Some(tx.id);
                }
                if ui.button(UI_TEXT.label_close.as_str()).clicked() {
                    close = true;
                }
            });
        });

    if !open || close || delete.is_some() {
        *selected = None;
    }
    delete
}

fn price_label(price: Option<f64>) -> String {
    price.map(format_price).unwrap_or_else(|| "-".to_string())
}

fn date_label(raw: Option<&str>, with_time: bool) -> String {
    match raw {
        Some(s) => TimeUtils::parse_to_epoch_secs(s)
            .map(|t| epoch_sec_to_label(t, with_time))
            .unwrap_or_else(|| s.to_string()),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_reformatted_when_parsable() {
        assert_eq!(date_label(Some("2024-01-02T15:30:00"), false), "2024-01-02");
        assert_eq!(date_label(Some("2024-01-02T15:30:00"), true), "2024-01-02 15:30");
        assert_eq!(date_label(Some("yesterday"), false), "yesterday");
        assert_eq!(date_label(None, false), "-");
    }

    #[test]
    fn missing_price_shows_a_dash() {
        assert_eq!(price_label(None), "-");
        assert_eq!(price_label(Some(12.5)), "$12.50");
    }
}
