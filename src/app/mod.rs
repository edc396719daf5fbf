mod root;
mod route;
mod state;
mod tasks;

pub(crate) use state::{
    ChatState, OptimizationPage, PortfolioPage, SearchPage, StockPage, TransactionsPage,
    should_search,
};

pub use root::App;
pub use route::Route;
