//! Background work for the UI thread.
//!
//! Every request runs on the tokio runtime and reports back over a std
//! channel; `update` drains it each frame. The egui context is poked after
//! every send so results show up without waiting for input.

use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use eframe::egui::Context;
use tokio::runtime::Handle;

use crate::config::BACKEND;
use crate::data::{DashboardApi, FetchError, MarketDataProvider, TickSink};
use crate::domain::{Bar, LiveTick, Timeframe};
use crate::models::{
    Asset, ChatTurn, NewTransaction, OptimizationResult, PortfolioSummary, SearchQuote, StockInfo,
    Transaction,
};

#[cfg(debug_assertions)]
use crate::config::DF;

#[derive(Debug)]
pub enum TaskResult {
    Search {
        query: String,
        result: Result<Vec<SearchQuote>, FetchError>,
    },
    StockInfo {
        symbol: String,
        result: Result<StockInfo, FetchError>,
    },
    History {
        generation: u64,
        result: Result<Vec<Bar>, FetchError>,
    },
    Assets(Result<Vec<Asset>, FetchError>),
    Summary(Result<PortfolioSummary, FetchError>),
    Transactions(Result<Vec<Transaction>, FetchError>),
    TransactionCreated(Result<Transaction, FetchError>),
    TransactionDeleted {
        id: i64,
        result: Result<(), FetchError>,
    },
    Optimization(Result<OptimizationResult, FetchError>),
    Chat(Result<String, FetchError>),
}

pub struct TaskRunner {
    handle: Handle,
    api: Arc<DashboardApi>,
    ctx: Context,
    tx: Sender<TaskResult>,
}

impl TaskRunner {
    pub fn new(handle: Handle, api: Arc<DashboardApi>, ctx: Context) -> (Self, Receiver<TaskResult>) {
        let (tx, rx) = channel();
        (Self { handle, api, ctx, tx }, rx)
    }

    fn spawn<F, Fut>(&self, label: &'static str, make: F)
    where
        F: FnOnce(Arc<DashboardApi>) -> Fut,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        #[cfg(debug_assertions)]
        if DF.log_fetches {
            log::info!("Fetch started: {}", label);
        }
        #[cfg(not(debug_assertions))]
        let _ = label;

        let fut = make(self.api.clone());
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        self.handle.spawn(async move {
            let result = fut.await;
            // The UI may already be gone on shutdown.
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    pub fn search(&self, query: String) {
        self.spawn("search", move |api| async move {
            let result = api.search(&query, BACKEND.market.search_max_results).await;
            TaskResult::Search { query, result }
        });
    }

    pub fn stock_info(&self, symbol: String) {
        self.spawn("stock info", move |api| async move {
            let result = api.stock_info(&symbol).await;
            TaskResult::StockInfo { symbol, result }
        });
    }

    pub fn history(&self, symbol: String, timeframe: Timeframe, generation: u64) {
        self.spawn("history", move |api| async move {
            let result = api.fetch_history(&symbol, timeframe).await;
            TaskResult::History { generation, result }
        });
    }

    pub fn portfolio(&self) {
        self.spawn("assets", |api| async move { TaskResult::Assets(api.assets().await) });
        self.spawn("portfolio summary", |api| async move {
            TaskResult::Summary(api.portfolio_summary().await)
        });
    }

    pub fn transactions(&self) {
        self.spawn("transactions", |api| async move {
            TaskResult::Transactions(api.transactions().await)
        });
    }

    pub fn create_transaction(&self, tx: NewTransaction) {
        self.spawn("create transaction", move |api| async move {
            TaskResult::TransactionCreated(api.create_transaction(&tx).await)
        });
    }

    pub fn delete_transaction(&self, id: i64) {
        self.spawn("delete transaction", move |api| async move {
            let result = api.delete_transaction(id).await;
            TaskResult::TransactionDeleted { id, result }
        });
    }

    pub fn optimize(&self, budget: f64, risk_factor: f64) {
        self.spawn("optimize", move |api| async move {
            TaskResult::Optimization(api.optimize_portfolio(budget, risk_factor).await)
        });
    }

    pub fn chat(&self, message: String, history: Vec<ChatTurn>) {
        self.spawn("chat", move |api| async move {
            TaskResult::Chat(api.chat(&message, &history).await)
        });
    }
}

/// Tick sink that forwards to the UI thread and asks for a repaint.
pub struct RepaintingSink {
    tx: Sender<LiveTick>,
    ctx: Context,
}

impl RepaintingSink {
    pub fn new(ctx: Context) -> (Self, Receiver<LiveTick>) {
        let (tx, rx) = channel();
        (Self { tx, ctx }, rx)
    }
}

impl TickSink for RepaintingSink {
    fn deliver(&self, tick: LiveTick) {
        if self.tx.send(tick).is_ok() {
            self.ctx.request_repaint();
        }
    }
}
