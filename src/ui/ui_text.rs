use std::sync::LazyLock;

pub const ICON_SEARCH: &str = "\u{1f50d}";
pub const ICON_CHAT: &str = "\u{1f4ac}";

pub struct UiText {
    pub app_title: String,
    pub app_tagline: String,

    // --- NAV ---
    pub nav_search: String,
    pub nav_portfolio: String,
    pub nav_transactions: String,
    pub nav_optimization: String,
    pub nav_chat: String,

    // --- SEARCH ---
    pub search_hint: String,
    pub search_no_results: String,

    // --- STOCK ---
    pub stock_sector: String,
    pub stock_market_cap: String,
    pub stock_pe: String,
    pub stock_live_price: String,
    pub stock_loading: String,
    pub stock_no_history: String,
    pub chart_ohlc_open: String,
    pub chart_ohlc_high: String,
    pub chart_ohlc_low: String,
    pub chart_ohlc_close: String,

    // --- PORTFOLIO ---
    pub portfolio_heading: String,
    pub portfolio_total_invested: String,
    pub portfolio_total_value: String,
    pub portfolio_total_pnl: String,
    pub portfolio_invested: String,
    pub portfolio_current: String,
    pub portfolio_pnl: String,
    pub portfolio_view_details: String,

    // --- TRANSACTIONS ---
    pub tx_heading: String,
    pub tx_col_symbol: String,
    pub tx_col_type: String,
    pub tx_col_quantity: String,
    pub tx_col_price: String,
    pub tx_col_date: String,
    pub tx_details_title: String,
    pub tx_company_info: String,
    pub tx_no_description: String,
    pub tx_delete: String,
    pub tx_add: String,

    // --- OPTIMIZATION ---
    pub opt_heading: String,
    pub opt_budget: String,
    pub opt_risk: String,
    pub opt_risk_hint: String,
    pub opt_run: String,
    pub opt_running: String,
    pub opt_results: String,
    pub opt_current_value: String,

    // --- CHAT ---
    pub chat_title: String,
    pub chat_hint: String,
    pub chat_send: String,
    pub chat_thinking: String,
    pub chat_rate_limited: String,
    pub chat_generic_error: String,

    // General use
    pub label_na: String,
    pub label_close: String,
    pub label_refresh: String,
    pub label_connecting: String,
    pub label_connected: String,
    pub label_disconnected: String,
    pub label_error_prefix: String,
}

pub static UI_TEXT: LazyLock<UiText> = LazyLock::new(|| UiText {
    app_title: "BigBull".to_string(),
    app_tagline: "Investment Dashboard".to_string(),

    nav_search: format!("{} Search", ICON_SEARCH),
    nav_portfolio: "Portfolio".to_string(),
    nav_transactions: "Transactions".to_string(),
    nav_optimization: "Optimization".to_string(),
    nav_chat: format!("{} Assistant", ICON_CHAT),

    search_hint: "Search stocks by name or symbol...".to_string(),
    search_no_results: "No matches".to_string(),

    stock_sector: "Sector".to_string(),
    stock_market_cap: "Market Cap".to_string(),
    stock_pe: "P/E Ratio".to_string(),
    stock_live_price: "Live Price".to_string(),
    stock_loading: "Loading...".to_string(),
    stock_no_history: "No price history for this window".to_string(),
    chart_ohlc_open: "O".to_string(),
    chart_ohlc_high: "H".to_string(),
    chart_ohlc_low: "L".to_string(),
    chart_ohlc_close: "C".to_string(),

    portfolio_heading: "Portfolio Overview".to_string(),
    portfolio_total_invested: "Total Invested".to_string(),
    portfolio_total_value: "Total Value".to_string(),
    portfolio_total_pnl: "Total P&L".to_string(),
    portfolio_invested: "Invested".to_string(),
    portfolio_current: "Current".to_string(),
    portfolio_pnl: "P&L".to_string(),
    portfolio_view_details: "View Details".to_string(),

    tx_heading: "Transaction History".to_string(),
    tx_col_symbol: "Symbol".to_string(),
    tx_col_type: "Type".to_string(),
    tx_col_quantity: "Quantity".to_string(),
    tx_col_price: "Price".to_string(),
    tx_col_date: "Date".to_string(),
    tx_details_title: "Transaction".to_string(),
    tx_company_info: "Company Info".to_string(),
    tx_no_description: "No description available.".to_string(),
    tx_delete: "Delete".to_string(),
    tx_add: "Add".to_string(),

    opt_heading: "Portfolio Optimization".to_string(),
    opt_budget: "Budget ($)".to_string(),
    opt_risk: "Risk Factor".to_string(),
    opt_risk_hint: "Low risk = Stable assets • High risk = Growth assets".to_string(),
    opt_run: "Optimize".to_string(),
    opt_running: "Optimizing...".to_string(),
    opt_results: "Optimal Allocation".to_string(),
    opt_current_value: "Current Value".to_string(),

    chat_title: "BigBull Assistant".to_string(),
    chat_hint: "Ask about stocks, your portfolio...".to_string(),
    chat_send: "Send".to_string(),
    chat_thinking: "Thinking...".to_string(),
    chat_rate_limited: "Rate limit exceeded. Please wait a moment and try again.".to_string(),
    chat_generic_error: "Sorry, I encountered an error. Please try again.".to_string(),

    label_na: "N/A".to_string(),
    label_close: "Close".to_string(),
    label_refresh: "Refresh".to_string(),
    label_connecting: "Connecting".to_string(),
    label_connected: "Live".to_string(),
    label_disconnected: "Offline".to_string(),
    label_error_prefix: "Error".to_string(),
});
