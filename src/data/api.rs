//! HTTP client for the market and ledger services.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::config::{BACKEND, BackendEndpoints};
use crate::data::normalize_bars;
use crate::domain::{Bar, Timeframe};
use crate::models::{
    Asset, ChatReply, ChatRequest, ChatTurn, HistoryResponse, NewTransaction, OptimizationResult,
    PortfolioSummary, SearchQuote, SearchResponse, StockInfo, StockInfoResponse, StockQuote,
    Transaction,
};

#[cfg(debug_assertions)]
use crate::config::DF;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    Url(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_builder() {
            FetchError::Url(e.to_string())
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if e.status() == Some(StatusCode::TOO_MANY_REQUESTS) {
            FetchError::RateLimited
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Abstract source of chart history, so the chart can be driven without a live service.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: Client,
    market: Url,
    ledger: Url,
}

impl DashboardApi {
    pub fn new(endpoints: &BackendEndpoints) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(BACKEND.client.user_agent)
            .timeout(Duration::from_millis(endpoints.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            market: parse_base(&endpoints.market_url)?,
            ledger: parse_base(&endpoints.ledger_url)?,
        })
    }

    // ---- Market service ----

    pub async fn stock_history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, FetchError> {
        let url = endpoint(&self.market, &["api", "stock", "history", symbol])?;
        let resp: HistoryResponse = self
            .get_json(self.client.get(url).query(&[("timeframe", timeframe.label())]))
            .await?;

        Ok(normalize_bars(&resp.data))
    }

    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchQuote>, FetchError> {
        let url = endpoint(&self.market, &["api", "search"])?;
        let max_results = max_results.to_string();
        let resp: SearchResponse = self
            .get_json(
                self.client
                    .get(url)
                    .query(&[("query", query), ("max_results", max_results.as_str())]),
            )
            .await?;
        Ok(resp.results.quotes)
    }

    pub async fn stock_info(&self, symbol: &str) -> Result<StockInfo, FetchError> {
        let url = endpoint(&self.market, &["api", "stock", "info", symbol])?;
        let resp: StockInfoResponse = self.get_json(self.client.get(url)).await?;
        Ok(resp.info)
    }

    pub async fn stock_quote(&self, symbol: &str) -> Result<StockQuote, FetchError> {
        let url = endpoint(&self.market, &["api", "stock", "quote", symbol])?;
        self.get_json(self.client.get(url)).await
    }

    pub async fn optimize_portfolio(
        &self,
        budget: f64,
        risk_factor: f64,
    ) -> Result<OptimizationResult, FetchError> {
        let url = endpoint(&self.market, &["api", "portfolio", "optimize"])?;
        self.get_json(self.client.get(url).query(&[("budget", budget), ("risk_factor", risk_factor)]))
            .await
    }

    /// Sends the message with at most the configured number of trailing turns.
    pub async fn chat(&self, message: &str, history: &[ChatTurn]) -> Result<String, FetchError> {
        let url = endpoint(&self.market, &["api", "chatbot"])?;
        let body = ChatRequest::new(message, history, BACKEND.market.chat_history_turns);
        let reply: ChatReply = self.get_json(self.client.post(url).json(&body)).await?;
        Ok(reply.response)
    }

    // ---- Ledger service ----

    pub async fn transactions(&self) -> Result<Vec<Transaction>, FetchError> {
        let url = endpoint(&self.ledger, &["api", "transactions"])?;
        self.get_json(self.client.get(url)).await
    }

    pub async fn transaction(&self, id: i64) -> Result<Transaction, FetchError> {
        let url = endpoint(&self.ledger, &["api", "transactions", &id.to_string()])?;
        self.get_json(self.client.get(url)).await
    }

    pub async fn transactions_for_asset(&self, asset_id: i64) -> Result<Vec<Transaction>, FetchError> {
        let url = endpoint(&self.ledger, &["api", "transactions", "asset", &asset_id.to_string()])?;
        self.get_json(self.client.get(url)).await
    }

    pub async fn transactions_for_symbol(&self, symbol: &str) -> Result<Vec<Transaction>, FetchError> {
        let url = endpoint(&self.ledger, &["api", "transactions", "symbol", symbol])?;
        self.get_json(self.client.get(url)).await
    }

    pub async fn create_transaction(&self, tx: &NewTransaction) -> Result<Transaction, FetchError> {
        let url = endpoint(&self.ledger, &["api", "transactions"])?;
        self.get_json(self.client.post(url).json(tx)).await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<(), FetchError> {
        let url = endpoint(&self.ledger, &["api", "transactions", &id.to_string()])?;
        self.send_checked(self.client.delete(url)).await.map(|_| ())
    }

    pub async fn assets(&self) -> Result<Vec<Asset>, FetchError> {
        let url = endpoint(&self.ledger, &["api", "assets"])?;
        self.get_json(self.client.get(url)).await
    }

    pub async fn portfolio_summary(&self) -> Result<PortfolioSummary, FetchError> {
        let url = endpoint(&self.ledger, &["api", "portfolio", "summary"])?;
        self.get_json(self.client.get(url)).await
    }

    // ---- Plumbing ----

    async fn send_checked(&self, req: RequestBuilder) -> Result<reqwest::Response, FetchError> {
        let resp = req.send().await?;
        let status = resp.status();

        #[cfg(debug_assertions)]
        if DF.log_fetches {
            log::info!("{} <- {}", status, resp.url());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, FetchError> {
        let bytes = self.send_checked(req).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for DashboardApi {
    async fn fetch_history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, FetchError> {
        self.stock_history(symbol, timeframe).await
    }
}

fn parse_base(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::Url(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::Url(raw.to_string()));
    }
    Ok(url)
}

/// Appends path segments to a base url, percent-encoding each one.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FetchError::Url(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
