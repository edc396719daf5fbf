mod plot_layers;
mod styles;
mod ui_config;
mod ui_plot_view;
mod ui_text;
mod utils;
mod view_model;
mod views;

pub(crate) use styles::{UiStyleExt, connection_badge};
pub(crate) use ui_config::{UI_CONFIG, UI_TEXT};
pub(crate) use utils::setup_custom_visuals;
pub(crate) use views::{
    ViewAction, show_chat, show_optimization, show_portfolio, show_search, show_stock,
    show_transactions,
};

pub use ui_plot_view::{ChartFrameOutput, EguiChartSurface};
pub use view_model::ViewModel;
