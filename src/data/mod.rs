mod api;
mod normalize;
pub mod price_stream;
mod stream_message;

pub use {
    api::{DashboardApi, FetchError, MarketDataProvider},
    normalize::{RawBar, normalize_bars},
    price_stream::{ConnectionStatus, PriceStreamManager, TickSink},
    stream_message::{decode_frame, subscribe_message, ticks_from_frame, ticks_from_message},
};
