//! Debugging feature flags.

pub struct LogFlags {
    /// Emit verbose logging for live price stream connections and ticks.
    pub log_price_stream_updates: bool,

    /// Series replacement and live patches applied to the chart.
    pub log_chart_updates: bool,

    /// Outgoing REST calls and their outcome.
    pub log_fetches: bool,

    /// Route changes.
    pub log_navigation: bool,
}

pub const DF: LogFlags = LogFlags {
    log_price_stream_updates: false,
    log_chart_updates: false,
    log_fetches: true,
    log_navigation: true,
};
