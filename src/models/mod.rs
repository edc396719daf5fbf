mod chat;
mod ledger;
mod market;

pub use chat::{ChatReply, ChatRequest, ChatRole, ChatTurn};
pub use ledger::{
    Asset, NewTransaction, PortfolioSummary, PortfolioTotals, Transaction, TransactionType,
};
pub use market::{
    Allocation, HistoryResponse, OptimizationResult, SearchQuote, SearchResponse, SearchResults,
    StockInfo, StockInfoResponse, StockQuote,
};
