// src/app/state.rs

use std::cell::RefCell;
use std::rc::Rc;

use crate::chart::{ChartEvents, CrosshairOhlc, LiveChart};
use crate::data::FetchError;
use crate::domain::Timeframe;
use crate::models::{
    Asset, ChatTurn, OptimizationResult, PortfolioSummary, SearchQuote, StockInfo, Transaction,
};
use crate::ui::EguiChartSurface;

/// Remote data shown by a view. A failed refresh keeps the previous value.
#[derive(Debug)]
pub(crate) struct Loadable<T> {
    pub(crate) data: Option<T>,
    pub(crate) loading: bool,
    pub(crate) error: Option<FetchError>,
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Loadable<T> {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn finish(&mut self, result: Result<T, FetchError>) {
        self.loading = false;
        match result {
            Ok(v) => {
                self.data = Some(v);
                self.error = None;
            }
            Err(e) => {
                log::warn!("Request failed: {}", e);
                self.error = Some(e);
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SearchPage {
    pub(crate) query: String,
    /// Query the current results belong to.
    pub(crate) results_for: String,
    pub(crate) results: Loadable<Vec<SearchQuote>>,
    /// Latest query sent to the market service and not answered yet.
    pub(crate) in_flight: Option<String>,
}

impl SearchPage {
    pub(crate) fn begin(&mut self, query: &str) {
        self.in_flight = Some(query.to_string());
        self.results.begin();
    }

    /// Shows the answer only if it matches what is typed now. The spinner
    /// stays up while a newer query is still out. Returns whether it was shown.
    pub(crate) fn apply(&mut self, query: String, result: Result<Vec<SearchQuote>, FetchError>) -> bool {
        let newer_pending = self.in_flight.as_ref().is_some_and(|q| *q != query);
        if !newer_pending {
            self.in_flight = None;
        }

        let current = query == self.query.trim();
        if current {
            self.results_for = query;
            self.results.finish(result);
        }
        self.results.loading = newer_pending;
        current
    }
}

/// Minimum query length before the market service is asked.
pub(crate) fn should_search(query: &str) -> bool {
    query.trim().chars().count() > 1
}

/// Detail page of one symbol. Owns its chart; dropping the page tears it down.
pub(crate) struct StockPage {
    pub(crate) symbol: String,
    pub(crate) timeframe: Timeframe,
    pub(crate) info: Loadable<StockInfo>,
    pub(crate) history: Loadable<()>,
    pub(crate) chart: LiveChart<EguiChartSurface>,
    pub(crate) events: ChartEvents,
    pub(crate) crosshair: Rc<RefCell<Option<CrosshairOhlc>>>,
    pub(crate) live_price: Option<f64>,
    pub(crate) last_width: f32,
}

impl StockPage {
    pub(crate) fn new(symbol: String, timeframe: Timeframe, width: f32) -> Self {
        let events = ChartEvents::default();
        let crosshair: Rc<RefCell<Option<CrosshairOhlc>>> = Rc::new(RefCell::new(None));
        let readout = crosshair.clone();
        let chart = LiveChart::mount(
            EguiChartSurface::new(),
            &events,
            width,
            Some(Box::new(move |ohlc| *readout.borrow_mut() = Some(ohlc))),
        );
        Self {
            symbol,
            timeframe,
            info: Loadable::default(),
            history: Loadable::default(),
            chart,
            events,
            crosshair,
            live_price: None,
            last_width: width,
        }
    }

    /// Tick price when one arrived, else the quote from the info endpoint.
    pub(crate) fn display_price(&self) -> Option<f64> {
        self.live_price.or_else(|| {
            self.info
                .data
                .as_ref()
                .and_then(|i| i.current_price)
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct PortfolioPage {
    pub(crate) assets: Loadable<Vec<Asset>>,
    pub(crate) summary: Loadable<PortfolioSummary>,
}

#[derive(Debug)]
pub(crate) struct NewTransactionForm {
    pub(crate) symbol: String,
    pub(crate) buy: bool,
    pub(crate) quantity: f64,
    pub(crate) price: f64,
}

impl Default for NewTransactionForm {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            buy: true,
            quantity: 1.0,
            price: 0.0,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct TransactionsPage {
    pub(crate) list: Loadable<Vec<Transaction>>,
    pub(crate) selected: Option<Transaction>,
    pub(crate) form: NewTransactionForm,
    pub(crate) action_error: Option<FetchError>,
}

#[derive(Debug)]
pub(crate) struct OptimizationPage {
    pub(crate) budget: f64,
    pub(crate) risk_factor: f64,
    pub(crate) result: Loadable<OptimizationResult>,
}

impl Default for OptimizationPage {
    fn default() -> Self {
        Self {
            budget: 10_000.0,
            risk_factor: 0.3,
            result: Loadable::default(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ChatState {
    pub(crate) open: bool,
    pub(crate) input: String,
    pub(crate) turns: Vec<ChatTurn>,
    pub(crate) pending: bool,
}

impl ChatState {
    /// Records the user's message and returns the history to send with it.
    pub(crate) fn push_user(&mut self, message: &str) -> Vec<ChatTurn> {
        let history = self.turns.clone();
        self.turns.push(ChatTurn::user(message));
        self.pending = true;
        history
    }

    pub(crate) fn finish(&mut self, result: Result<String, FetchError>, rate_limited: &str, generic: &str) {
        self.pending = false;
        let reply = match result {
            Ok(text) => text,
            Err(FetchError::RateLimited) => rate_limited.to_string(),
            Err(e) => {
                log::warn!("Chat request failed: {}", e);
                generic.to_string()
            }
        };
        self.turns.push(ChatTurn::assistant(reply));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_refresh_keeps_stale_data() {
        let mut l: Loadable<Vec<i32>> = Loadable::default();
        l.begin();
        l.finish(Ok(vec![1, 2]));
        l.begin();
        assert!(l.loading);
        l.finish(Err(FetchError::Timeout));
        assert!(!l.loading);
        assert_eq!(l.data, Some(vec![1, 2]));
        assert_eq!(l.error, Some(FetchError::Timeout));
    }

    #[test]
    fn search_needs_more_than_one_character() {
        assert!(!should_search(""));
        assert!(!should_search("a"));
        assert!(!should_search(" a "));
        assert!(should_search("ap"));
    }

    #[test]
    fn answer_to_an_abandoned_query_stops_the_spinner() {
        let mut page = SearchPage {
            query: "ap".into(),
            results_for: "ap".into(),
            ..Default::default()
        };
        page.begin("app");
        // User deleted back to "ap"; no new request goes out.
        page.query = "ap".into();

        assert!(!page.apply("app".into(), Ok(Vec::new())));
        assert!(!page.results.loading);
        assert_eq!(page.in_flight, None);
        assert_eq!(page.results_for, "ap");
    }

    #[test]
    fn older_answer_keeps_spinner_for_the_newer_query() {
        let mut page = SearchPage::default();
        page.query = "ap".into();
        page.begin("ap");
        page.query = "app".into();
        page.begin("app");

        assert!(!page.apply("ap".into(), Ok(Vec::new())));
        assert!(page.results.loading);

        assert!(page.apply("app".into(), Ok(Vec::new())));
        assert!(!page.results.loading);
        assert_eq!(page.results_for, "app");
    }

    #[test]
    fn optimization_starts_at_a_cautious_risk() {
        let page = OptimizationPage::default();
        assert_eq!(page.risk_factor, 0.3);
        assert_eq!(page.budget, 10_000.0);
    }

    #[test]
    fn chat_errors_become_assistant_messages() {
        let mut chat = ChatState::default();
        let history = chat.push_user("hi");
        assert!(history.is_empty());
        assert!(chat.pending);

        chat.finish(Err(FetchError::RateLimited), "slow", "sorry");
        let history = chat.push_user("again");
        assert_eq!(history.len(), 2);
        chat.finish(Err(FetchError::Timeout), "slow", "sorry");

        let replies: Vec<&str> = chat.turns.iter().skip(1).step_by(2).map(|t| t.content.as_str()).collect();
        assert_eq!(replies, vec!["slow", "sorry"]);
        assert!(!chat.pending);
    }

    #[test]
    fn display_price_prefers_the_tick() {
        let mut page = StockPage::new("AAPL".into(), Timeframe::M1, 800.0);
        assert_eq!(page.display_price(), None);

        page.info.finish(Ok(StockInfo {
            current_price: Some(190.0),
            ..Default::default()
        }));
        assert_eq!(page.display_price(), Some(190.0));

        page.live_price = Some(191.5);
        assert_eq!(page.display_price(), Some(191.5));
    }
}
