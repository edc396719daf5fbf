mod chat;
mod optimization;
mod portfolio;
mod search;
mod stock;
mod transactions;

use crate::app::Route;
use crate::domain::Timeframe;
use crate::models::NewTransaction;

pub(crate) use chat::show_chat;
pub(crate) use optimization::show_optimization;
pub(crate) use portfolio::show_portfolio;
pub(crate) use search::show_search;
pub(crate) use stock::show_stock;
pub(crate) use transactions::show_transactions;

/// What a view asks the app to do. Views never touch the network themselves.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewAction {
    Navigate(Route),
    Search(String),
    SetTimeframe(Timeframe),
    RefreshPortfolio,
    RefreshTransactions,
    CreateTransaction(NewTransaction),
    DeleteTransaction(i64),
    Optimize { budget: f64, risk_factor: f64 },
    SendChat(String),
}
