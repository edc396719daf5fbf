use eframe::egui::{
    Align, Align2, Button, Context, Key, Layout, RichText, ScrollArea, TextEdit, Window,
};

use crate::app::ChatState;
use crate::models::ChatRole;
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::view_model::ViewModel;
use crate::ui::views::ViewAction;

/// Floating assistant window. Only drawn while `chat.open`.
pub(crate) fn show_chat(ctx: &Context, vm: &ViewModel, chat: &mut ChatState) -> Option<ViewAction> {
    if !chat.open {
        return None;
    }

    let mut open = chat.open;
    let mut action = None;

    Window::new(UI_TEXT.chat_title.as_str())
        .open(&mut open)
        .default_width(UI_CONFIG.chat_window_width)
        .anchor(Align2::RIGHT_BOTTOM, [-16.0, -40.0])
        .resizable(true)
        .show(ctx, |ui| {
            ScrollArea::vertical()
                .max_height(360.0)
                .stick_to_bottom(true)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for turn in &chat.turns {
                        match turn.role {
                            ChatRole::User => {
                                ui.with_layout(Layout::top_down(Align::Max), |ui| {
                                    ui.label(RichText::new(&turn.content).color(vm.palette.accent));
                                });
                            }
                            ChatRole::Assistant => {
                                ui.label(&turn.content);
                            }
                        }
                        ui.add_space(4.0);
                    }
                    if chat.pending {
                        ui.label_subdued(&UI_TEXT.chat_thinking);
                    }
                });

            ui.separator();
            ui.horizontal(|ui| {
                let input = ui.add(
                    TextEdit::singleline(&mut chat.input)
                        .hint_text(&UI_TEXT.chat_hint)
                        .desired_width(UI_CONFIG.chat_window_width - 70.0),
                );
                let enter = input.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
                let send = ui
                    .add_enabled(!chat.pending, Button::new(UI_TEXT.chat_send.as_str()))
                    .clicked();

                let message = chat.input.trim().to_string();
                if (enter || send) && !chat.pending && !message.is_empty() {
                    chat.input.clear();
                    action = Some(ViewAction::SendChat(message));
                    input.request_focus();
                }
            });
        });

    chat.open = open;
    action
}
