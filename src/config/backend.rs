/// Market service: search, quotes, history, optimization, chat and the price stream.
pub struct MarketServiceConfig {
    pub base_url: &'static str,
    pub stream_url: &'static str,
    pub search_max_results: u32,
    /// Turns of prior conversation sent along with each chat message.
    pub chat_history_turns: usize,
}

/// Ledger service: transactions, assets and portfolio summary.
pub struct LedgerServiceConfig {
    pub base_url: &'static str,
}

pub struct WsConfig {
    pub max_reconnect_delay_sec: u64,
    pub initial_reconnect_delay_sec: u64,
    /// How long to wait for the server to answer our Close frame.
    pub close_timeout_ms: u64,
}

pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

pub struct BackendConfig {
    pub market: MarketServiceConfig,
    pub ledger: LedgerServiceConfig,
    pub ws: WsConfig,
    pub client: ClientDefaults,
}

pub const BACKEND: BackendConfig = BackendConfig {
    market: MarketServiceConfig {
        base_url: "http://localhost:5000",
        stream_url: "ws://localhost:5000/ws/stream",
        search_max_results: 5,
        chat_history_turns: 6,
    },
    ledger: LedgerServiceConfig {
        base_url: "http://localhost:8080",
    },
    ws: WsConfig {
        max_reconnect_delay_sec: 60,
        initial_reconnect_delay_sec: 1,
        close_timeout_ms: 2000,
    },
    client: ClientDefaults {
        timeout_ms: 10_000,
        user_agent: "bigbull/0.1.0",
    },
};

/// Endpoints resolved at startup: compile-time defaults, overridden from the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoints {
    pub market_url: String,
    pub ledger_url: String,
    pub stream_url: String,
    pub timeout_ms: u64,
}

impl Default for BackendEndpoints {
    fn default() -> Self {
        Self {
            market_url: BACKEND.market.base_url.to_string(),
            ledger_url: BACKEND.ledger.base_url.to_string(),
            stream_url: BACKEND.market.stream_url.to_string(),
            timeout_ms: BACKEND.client.timeout_ms,
        }
    }
}

impl BackendEndpoints {
    pub fn with_overrides(
        market_url: Option<String>,
        ledger_url: Option<String>,
        stream_url: Option<String>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            market_url: market_url.unwrap_or(defaults.market_url),
            ledger_url: ledger_url.unwrap_or(defaults.ledger_url),
            stream_url: stream_url.unwrap_or(defaults.stream_url),
            timeout_ms: defaults.timeout_ms,
        }
    }
}
