#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod app;
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate (for the binary and integration tests)
pub use app::App;
pub use config::PERSISTENCE;
pub use data::{DashboardApi, FetchError, PriceStreamManager};
pub use domain::{Bar, LiveTick, Timeframe};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the market service (search, quotes, history, chat)
    #[arg(long)]
    pub market_url: Option<String>,

    /// Base URL of the ledger service (transactions, assets)
    #[arg(long)]
    pub ledger_url: Option<String>,

    /// WebSocket URL of the live price stream
    #[arg(long)]
    pub stream_url: Option<String>,

    /// Open this stock on start
    #[arg(long)]
    pub symbol: Option<String>,

    /// History window for the chart (1D, 5D, 1M, 3M, 6M, 1Y, 5Y, MAX)
    #[arg(long)]
    pub timeframe: Option<Timeframe>,
}

/// Main application entry point - creates the GUI app.
/// Network work runs on the runtime behind `handle`.
pub fn run_app(
    cc: &eframe::CreationContext<'_>,
    args: Cli,
    handle: tokio::runtime::Handle,
) -> App {
    App::new(cc, args, handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_parse() {
        let cli = Cli::try_parse_from([
            "bigbull",
            "--market-url",
            "http://m:5000",
            "--symbol",
            "aapl",
            "--timeframe",
            "6m",
        ])
        .unwrap();
        assert_eq!(cli.market_url.as_deref(), Some("http://m:5000"));
        assert_eq!(cli.symbol.as_deref(), Some("aapl"));
        assert_eq!(cli.timeframe, Some(Timeframe::M6));
        assert!(cli.ledger_url.is_none());
    }

    #[test]
    fn bad_timeframe_is_rejected() {
        assert!(Cli::try_parse_from(["bigbull", "--timeframe", "2W"]).is_err());
    }
}
