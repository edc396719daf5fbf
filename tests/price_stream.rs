//! Live price stream against a local WebSocket server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bigbull::LiveTick;
use bigbull::data::{ConnectionStatus, PriceStreamManager};
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[derive(Debug, Clone, PartialEq)]
enum ServerEvent {
    Subscribe { conn: usize, symbols: Vec<String> },
    Close { conn: usize },
}

type EventLog = Arc<Mutex<Vec<ServerEvent>>>;

fn data_frame(symbol: &str, price: f64) -> String {
    json!({ "type": "data", "data": { symbol: { "price": price, "volume": 10 } } }).to_string()
}

/// Accepts any number of connections. Each subscriber gets one frame holding
/// two valid messages around a corrupt line.
async fn start_server() -> (String, EventLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let events: EventLog = Arc::default();
    let next_conn = Arc::new(AtomicUsize::new(0));

    let log = events.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let conn = next_conn.fetch_add(1, Ordering::SeqCst);
            let log = log.clone();
            tokio::spawn(async move {
                let Ok(mut ws) = accept_async(stream).await else {
                    return;
                };
                while let Some(Ok(msg)) = ws.next().await {
                    match msg {
                        Message::Text(text) => {
                            let v: Value = serde_json::from_str(text.as_str()).unwrap();
                            assert_eq!(v["action"], "subscribe");
                            let symbols: Vec<String> =
                                serde_json::from_value(v["symbols"].clone()).unwrap();
                            log.lock().unwrap().push(ServerEvent::Subscribe {
                                conn,
                                symbols: symbols.clone(),
                            });
                            for symbol in &symbols {
                                let frame = format!(
                                    "{}\n{{\"type\":\"data\",\"data\":{{\n{}",
                                    data_frame(symbol, 1.0),
                                    data_frame(symbol, 2.0)
                                );
                                let _ = ws.send(Message::text(frame)).await;
                            }
                        }
                        Message::Close(_) => {
                            log.lock().unwrap().push(ServerEvent::Close { conn });
                            // Keep polling so the close reply gets flushed.
                        }
                        _ => {}
                    }
                }
            });
        }
    });

    (format!("ws://{}", addr), events)
}

async fn next_tick(rx: &mut UnboundedReceiver<LiveTick>) -> LiveTick {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no tick within 5s")
        .expect("tick channel closed")
}

async fn wait_for_status(manager: &PriceStreamManager, wanted: ConnectionStatus) {
    for _ in 0..100 {
        if manager.status() == wanted {
            return;
        }
        sleep(Duration::from_millis(50)).await;
    }
    panic!("status never became {:?}", wanted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn corrupt_line_between_valid_messages_is_skipped() {
    let (url, _events) = start_server().await;
    let (tx, mut rx) = unbounded_channel();
    let manager = PriceStreamManager::new(url, Arc::new(tx), &Handle::current());

    manager.subscribe(vec!["AAPL".to_string()]);

    let first = next_tick(&mut rx).await;
    let second = next_tick(&mut rx).await;
    assert_eq!((first.symbol.as_str(), first.price), ("AAPL", 1.0));
    assert_eq!((second.symbol.as_str(), second.price), ("AAPL", 2.0));
    assert_eq!(second.volume, Some(10.0));

    assert_eq!(manager.status(), ConnectionStatus::Connected);
    assert_eq!(manager.get_price("AAPL"), Some(2.0));
    assert_eq!(manager.subscribed_symbols(), vec!["AAPL".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn changing_symbol_closes_old_connection_before_subscribing() {
    let (url, events) = start_server().await;
    let (tx, mut rx) = unbounded_channel();
    let manager = PriceStreamManager::new(url, Arc::new(tx), &Handle::current());

    manager.subscribe(vec!["AAPL".to_string()]);
    assert_eq!(next_tick(&mut rx).await.symbol, "AAPL");

    manager.subscribe(vec!["MSFT".to_string()]);
    loop {
        if next_tick(&mut rx).await.symbol == "MSFT" {
            break;
        }
    }

    assert_eq!(manager.get_price("AAPL"), None, "prices from the old subscription linger");
    assert!(manager.get_price("MSFT").is_some());

    let log = events.lock().unwrap().clone();
    let closed_first = log
        .iter()
        .position(|e| *e == ServerEvent::Close { conn: 0 })
        .expect("first connection was never closed");
    let second_subscribe = log
        .iter()
        .position(|e| matches!(e, ServerEvent::Subscribe { conn: 1, .. }))
        .expect("second connection never subscribed");

    assert!(
        closed_first < second_subscribe,
        "close must precede the new subscription: {:?}",
        log
    );
    assert_eq!(
        log[second_subscribe],
        ServerEvent::Subscribe {
            conn: 1,
            symbols: vec!["MSFT".to_string()]
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unsubscribe_closes_the_socket() {
    let (url, events) = start_server().await;
    let (tx, mut rx) = unbounded_channel();
    let manager = PriceStreamManager::new(url, Arc::new(tx), &Handle::current());

    manager.subscribe(vec!["TSLA".to_string()]);
    next_tick(&mut rx).await;

    manager.unsubscribe();
    wait_for_status(&manager, ConnectionStatus::Disconnected).await;

    assert!(manager.subscribed_symbols().is_empty());
    assert_eq!(manager.get_price("TSLA"), None);
    assert!(events.lock().unwrap().contains(&ServerEvent::Close { conn: 0 }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_server_reports_disconnected() {
    // Grab a free port, then release it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (tx, _rx) = unbounded_channel();
    let manager = PriceStreamManager::new(format!("ws://{}", addr), Arc::new(tx), &Handle::current());
    assert_eq!(manager.status(), ConnectionStatus::Disconnected);

    manager.subscribe(vec!["AAPL".to_string()]);
    wait_for_status(&manager, ConnectionStatus::Disconnected).await;
    assert_eq!(manager.get_price("AAPL"), None);
}
