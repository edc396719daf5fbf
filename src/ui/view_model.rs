use crate::config::BackendEndpoints;
use crate::data::ConnectionStatus;
use crate::ui::ui_config::{UI_CONFIG, UiColors};

/// Read-only context handed to every view for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewModel<'a> {
    pub palette: UiColors,
    pub market_url: &'a str,
    pub ledger_url: &'a str,
    pub connection: ConnectionStatus,
}

impl<'a> ViewModel<'a> {
    pub fn new(endpoints: &'a BackendEndpoints, connection: ConnectionStatus) -> Self {
        Self {
            palette: UI_CONFIG.colors,
            market_url: &endpoints.market_url,
            ledger_url: &endpoints.ledger_url,
            connection,
        }
    }
}
