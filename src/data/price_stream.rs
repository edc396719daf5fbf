use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::config::BACKEND;
use crate::data::stream_message::{subscribe_message, ticks_from_frame};
use crate::domain::LiveTick;

#[cfg(debug_assertions)]
use crate::config::DF;

type StreamError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Disconnected,
}

/// Receiver side of the stream. Ticks are handed over one at a time, in the
/// order they were decoded.
pub trait TickSink: Send + Sync {
    fn deliver(&self, tick: LiveTick);
}

impl TickSink for std::sync::mpsc::Sender<LiveTick> {
    fn deliver(&self, tick: LiveTick) {
        // Receiver gone means nobody is watching any more.
        let _ = self.send(tick);
    }
}

impl TickSink for UnboundedSender<LiveTick> {
    fn deliver(&self, tick: LiveTick) {
        let _ = self.send(tick);
    }
}

#[derive(Debug)]
enum StreamCommand {
    Subscribe(Vec<String>),
    Unsubscribe,
    Shutdown,
}

enum SessionEnd {
    /// Server closed the socket (or the stream ended).
    Closed,
    /// A command arrived; the socket has already been closed. `None` when the
    /// manager itself is gone.
    Command(Option<StreamCommand>),
}

#[derive(Default)]
struct SharedState {
    prices: Mutex<HashMap<String, f64>>,
    status: Mutex<Option<ConnectionStatus>>,
}

impl SharedState {
    fn set_status(&self, status: ConnectionStatus) {
        *lock(&self.status) = Some(status);
    }

    /// Prices belong to one subscription; a new one starts empty.
    fn clear_prices(&self) {
        lock(&self.prices).clear();
    }
}

/// One live connection to the market stream, owned by whoever shows live data.
///
/// All socket work happens on a single task, so a resubscription always closes
/// the previous socket (and waits for the close handshake) before the next one
/// is opened and sends its subscribe message.
pub struct PriceStreamManager {
    shared: Arc<SharedState>,
    subscribed: Mutex<Vec<String>>,
    cmd_tx: UnboundedSender<StreamCommand>,
}

impl PriceStreamManager {
    /// Spawns the connection task on `handle`. Nothing connects until `subscribe`.
    pub fn new(url: impl Into<String>, sink: Arc<dyn TickSink>, handle: &Handle) -> Self {
        let shared = Arc::new(SharedState::default());
        let (cmd_tx, cmd_rx) = unbounded_channel();

        handle.spawn(run_price_stream_with_reconnect(
            url.into(),
            cmd_rx,
            shared.clone(),
            sink,
        ));

        Self {
            shared,
            subscribed: Mutex::new(Vec::new()),
            cmd_tx,
        }
    }

    /// Replace the current subscription. Any open connection is closed first.
    pub fn subscribe(&self, symbols: Vec<String>) {
        *lock(&self.subscribed) = symbols.clone();
        let _ = self.cmd_tx.send(StreamCommand::Subscribe(symbols));
    }

    /// Close the connection and stop reconnecting until the next `subscribe`.
    pub fn unsubscribe(&self) {
        lock(&self.subscribed).clear();
        let _ = self.cmd_tx.send(StreamCommand::Unsubscribe);
    }

    pub fn subscribed_symbols(&self) -> Vec<String> {
        lock(&self.subscribed).clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        lock(&self.shared.status).unwrap_or(ConnectionStatus::Disconnected)
    }

    /// Last usable price seen for `symbol` since the current subscription began.
    pub fn get_price(&self, symbol: &str) -> Option<f64> {
        lock(&self.shared.prices).get(symbol).copied()
    }
}

impl Drop for PriceStreamManager {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(StreamCommand::Shutdown);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_price_stream_with_reconnect(
    url: String,
    mut cmd_rx: UnboundedReceiver<StreamCommand>,
    shared: Arc<SharedState>,
    sink: Arc<dyn TickSink>,
) {
    let initial_delay = BACKEND.ws.initial_reconnect_delay_sec;
    let mut reconnect_delay = initial_delay;
    let mut symbols: Vec<String> = Vec::new();

    loop {
        if symbols.is_empty() {
            shared.set_status(ConnectionStatus::Disconnected);
            match cmd_rx.recv().await {
                Some(StreamCommand::Subscribe(next)) => {
                    symbols = next;
                    shared.clear_prices();
                    reconnect_delay = initial_delay;
                }
                Some(StreamCommand::Unsubscribe) => {}
                Some(StreamCommand::Shutdown) | None => break,
            }
            continue;
        }

        shared.set_status(ConnectionStatus::Connecting);

        #[cfg(debug_assertions)]
        if DF.log_price_stream_updates {
            log::info!("Connecting to price stream {} for {:?}", url, symbols);
        }

        match run_price_stream(&url, &symbols, &mut cmd_rx, &shared, sink.as_ref()).await {
            Ok(SessionEnd::Command(Some(StreamCommand::Subscribe(next)))) => {
                symbols = next;
                shared.clear_prices();
                reconnect_delay = initial_delay;
                continue;
            }
            Ok(SessionEnd::Command(Some(StreamCommand::Unsubscribe))) => {
                symbols.clear();
                shared.clear_prices();
                continue;
            }
            Ok(SessionEnd::Command(Some(StreamCommand::Shutdown) | None)) => break,
            Ok(SessionEnd::Closed) => {
                log::warn!("Price stream closed by server. Reconnecting...");
                reconnect_delay = initial_delay;
            }
            Err(e) => {
                log::error!(
                    "Price stream connection failed: {}. Retrying in {}s...",
                    e,
                    reconnect_delay
                );
            }
        }

        shared.set_status(ConnectionStatus::Disconnected);

        // Backoff, but stay responsive to commands while waiting.
        tokio::select! {
            _ = sleep(Duration::from_secs(reconnect_delay)) => {
                reconnect_delay = (reconnect_delay * 2).min(BACKEND.ws.max_reconnect_delay_sec);
            }
            cmd = cmd_rx.recv() => match cmd {
                Some(StreamCommand::Subscribe(next)) => {
                    symbols = next;
                    shared.clear_prices();
                    reconnect_delay = initial_delay;
                }
                Some(StreamCommand::Unsubscribe) => {
                    symbols.clear();
                    shared.clear_prices();
                }
                Some(StreamCommand::Shutdown) | None => break,
            },
        }
    }

    shared.set_status(ConnectionStatus::Disconnected);

    #[cfg(debug_assertions)]
    if DF.log_price_stream_updates {
        log::info!("Price stream task finished");
    }
}

async fn run_price_stream(
    url: &str,
    symbols: &[String],
    cmd_rx: &mut UnboundedReceiver<StreamCommand>,
    shared: &SharedState,
    sink: &dyn TickSink,
) -> Result<SessionEnd, StreamError> {
    let ws_stream = tokio::select! {
        res = connect_async(url) => res?.0,
        cmd = cmd_rx.recv() => return Ok(SessionEnd::Command(cmd)),
    };

    let (mut write, mut read) = ws_stream.split();
    write.send(Message::text(subscribe_message(symbols))).await?;
    shared.set_status(ConnectionStatus::Connected);

    loop {
        tokio::select! {
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => handle_frame(text.as_str(), shared, sink),
                Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => handle_frame(text, shared, sink),
                    Err(_) => log::warn!("Ignoring non UTF-8 binary frame on price stream"),
                },
                Some(Ok(Message::Close(_))) | None => return Ok(SessionEnd::Closed),
                Some(Ok(_)) => {} // Ping/Pong/raw frames
                Some(Err(e)) => {
                    log::error!("Price stream error: {}", e);
                    return Err(e.into());
                }
            },
            cmd = cmd_rx.recv() => {
                // Close handshake: send Close, then drain until the server's
                // reply (or the socket ends), bounded by a timeout.
                if let Err(e) = write.send(Message::Close(None)).await {
                    log::warn!("Failed to send Close on price stream: {}", e);
                }
                let drained = timeout(Duration::from_millis(BACKEND.ws.close_timeout_ms), async {
                    while let Some(Ok(msg)) = read.next().await {
                        if msg.is_close() {
                            break;
                        }
                    }
                })
                .await;
                if drained.is_err() {
                    log::warn!("Price stream close handshake timed out");
                }
                return Ok(SessionEnd::Command(cmd));
            }
        }
    }
}

fn handle_frame(text: &str, shared: &SharedState, sink: &dyn TickSink) {
    for tick in ticks_from_frame(text) {
        if tick.is_usable() {
            lock(&shared.prices).insert(tick.symbol.clone(), tick.price);
        }

        #[cfg(debug_assertions)]
        if DF.log_price_stream_updates {
            log::info!("[tick] {} -> {:.4}", tick.symbol, tick.price);
        }

        sink.deliver(tick);
    }
}
