//! Realtime feed engine
//!
//! Drives a feed connection for one screen instance: subscribe on open,
//! micro-batch incoming updates through the reconciler, reconnect with a
//! fixed delay on any drop. One engine per screen, created on mount and
//! shut down on unmount — there is no process-wide singleton.

use super::reconciler::Reconciler;
use super::row::StockRow;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Asia::Ho_Chi_Minh;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

/// Feed engine configuration
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    pub url: String,
    pub topic: String,
    pub component: String,
    /// Micro-batching window between an update arriving and the flush
    pub flush_interval: Duration,
    /// Fixed delay before reconnecting after a drop
    pub reconnect_delay: Duration,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: "wss://feed.vnscreener.vn/realtime".to_string(),
            topic: "stockRealtimeBySymbols".to_string(),
            component: "priceTable".to_string(),
            flush_interval: Duration::from_millis(150),
            reconnect_delay: Duration::from_millis(2000),
        }
    }
}

/// Feed connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Disconnected,
    Connecting,
    Open,
    Closed,
}

/// Factory for feed connections
#[async_trait]
pub trait FeedTransport: Send + Sync + 'static {
    async fn connect(&self) -> Result<Box<dyn FeedConnection>>;
}

/// One live duplex feed connection
#[async_trait]
pub trait FeedConnection: Send {
    async fn send_text(&mut self, text: String) -> Result<()>;
    /// Next text message; `None` means the peer closed
    async fn next_text(&mut self) -> Option<Result<String>>;
    async fn close(&mut self);
}

/// tokio-tungstenite transport
pub struct WsFeedTransport {
    url: String,
}

impl WsFeedTransport {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl FeedTransport for WsFeedTransport {
    async fn connect(&self) -> Result<Box<dyn FeedConnection>> {
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        let (write, read) = ws_stream.split();
        Ok(Box::new(WsFeedConnection { write, read }))
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct WsFeedConnection {
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
}

#[async_trait]
impl FeedConnection for WsFeedConnection {
    async fn send_text(&mut self, text: String) -> Result<()> {
        self.write.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn next_text(&mut self) -> Option<Result<String>> {
        loop {
            match self.read.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text.to_string())),
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(AppError::WebSocket(e))),
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.write.close().await;
    }
}

/// Outbound subscription message for the currently indexed symbols
fn subscribe_message(config: &RealtimeConfig, symbols: &[String]) -> String {
    json!({
        "type": "sub",
        "topic": config.topic,
        "variables": symbols,
        "component": config.component,
    })
    .to_string()
}

enum SessionEnd {
    Shutdown,
    Dropped,
}

/// Realtime engine for one price-list screen
pub struct RealtimeEngine {
    config: RealtimeConfig,
    reconciler: Arc<RwLock<Reconciler>>,
    status: Arc<RwLock<FeedStatus>>,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl RealtimeEngine {
    pub fn new(config: RealtimeConfig, rows: Vec<StockRow>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config,
            reconciler: Arc::new(RwLock::new(Reconciler::new(rows))),
            status: Arc::new(RwLock::new(FeedStatus::Disconnected)),
            shutdown_tx,
            task: None,
        }
    }

    /// Current row snapshot; pointer identity changes only on a real update
    pub fn rows(&self) -> Arc<Vec<StockRow>> {
        self.reconciler.read().rows()
    }

    /// Replace the displayed rows (fresh fetch)
    ///
    /// The live subscription self-heals at the next (re)connect, which
    /// always enumerates the currently indexed symbols.
    pub fn set_rows(&self, rows: Vec<StockRow>) {
        self.reconciler.write().set_rows(rows);
    }

    pub fn status(&self) -> FeedStatus {
        *self.status.read()
    }

    /// Spawn the connection loop; idempotent while a task is running
    pub fn start(&mut self, transport: Arc<dyn FeedTransport>) {
        if self.task.is_some() {
            return;
        }
        let reconciler = Arc::clone(&self.reconciler);
        let status = Arc::clone(&self.status);
        let config = self.config.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();
        self.task = Some(tokio::spawn(run_loop(
            config,
            transport,
            reconciler,
            status,
            shutdown_rx,
        )));
    }

    /// Tear down: cancel any pending flush and reconnect wait, close the
    /// connection, and wait for the task to finish
    pub async fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        *self.status.write() = FeedStatus::Disconnected;
    }
}

async fn run_loop(
    config: RealtimeConfig,
    transport: Arc<dyn FeedTransport>,
    reconciler: Arc<RwLock<Reconciler>>,
    status: Arc<RwLock<FeedStatus>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        *status.write() = FeedStatus::Connecting;
        let connected = tokio::select! {
            _ = shutdown_rx.changed() => return,
            connected = transport.connect() => connected,
        };
        match connected {
            Ok(conn) => {
                info!("feed connected");
                let end = session(conn, &config, &reconciler, &status, &mut shutdown_rx).await;
                *status.write() = FeedStatus::Closed;
                if matches!(end, SessionEnd::Shutdown) {
                    return;
                }
                // the flush deadline died with the session; updates buffered
                // before the drop must not wait for the next message
                reconciler.write().flush();
            }
            Err(e) => {
                warn!("feed connect failed: {}", e);
                *status.write() = FeedStatus::Disconnected;
            }
        }
        // single fixed-delay reconnect, cancellable at teardown
        tokio::select! {
            _ = shutdown_rx.changed() => return,
            _ = tokio::time::sleep(config.reconnect_delay) => {}
        }
    }
}

async fn session(
    mut conn: Box<dyn FeedConnection>,
    config: &RealtimeConfig,
    reconciler: &Arc<RwLock<Reconciler>>,
    status: &Arc<RwLock<FeedStatus>>,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> SessionEnd {
    let symbols = reconciler.read().symbols();
    if let Err(e) = conn.send_text(subscribe_message(config, &symbols)).await {
        warn!("feed subscribe failed: {}", e);
        conn.close().await;
        return SessionEnd::Dropped;
    }
    info!("feed subscribed to {} symbols", symbols.len());
    *status.write() = FeedStatus::Open;

    // nullable deadline guard: at most one pending flush at a time
    let mut flush_at: Option<tokio::time::Instant> = None;
    loop {
        let flush_timer = async {
            match flush_at {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = shutdown_rx.changed() => {
                conn.close().await;
                return SessionEnd::Shutdown;
            }
            _ = flush_timer => {
                flush_at = None;
                reconciler.write().flush();
            }
            message = conn.next_text() => match message {
                Some(Ok(text)) => {
                    let now = Utc::now().with_timezone(&Ho_Chi_Minh).time();
                    let buffered = reconciler.write().ingest(&text, now);
                    if buffered && flush_at.is_none() {
                        flush_at = Some(tokio::time::Instant::now() + config.flush_interval);
                    }
                }
                Some(Err(e)) => {
                    warn!("feed error: {}", e);
                    conn.close().await;
                    return SessionEnd::Dropped;
                }
                None => {
                    info!("feed closed by peer");
                    return SessionEnd::Dropped;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    struct MockConnection {
        incoming: mpsc::Receiver<String>,
        sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl FeedConnection for MockConnection {
        async fn send_text(&mut self, text: String) -> Result<()> {
            self.sent.lock().push(text);
            Ok(())
        }

        async fn next_text(&mut self) -> Option<Result<String>> {
            self.incoming.recv().await.map(Ok)
        }

        async fn close(&mut self) {
            self.incoming.close();
        }
    }

    /// Hands out one queued connection per connect attempt, then refuses
    struct MockTransport {
        incoming: Mutex<Vec<mpsc::Receiver<String>>>,
        sent: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl FeedTransport for MockTransport {
        async fn connect(&self) -> Result<Box<dyn FeedConnection>> {
            let mut queue = self.incoming.lock();
            if queue.is_empty() {
                return Err(AppError::Feed("no more connections".to_string()));
            }
            let incoming = queue.remove(0);
            Ok(Box::new(MockConnection {
                incoming,
                sent: Arc::clone(&self.sent),
            }))
        }
    }

    fn test_config() -> RealtimeConfig {
        RealtimeConfig {
            flush_interval: Duration::from_millis(10),
            reconnect_delay: Duration::from_millis(20),
            ..RealtimeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_subscribe_message_shape() {
        let config = RealtimeConfig::default();
        let message = subscribe_message(&config, &["ABC".to_string(), "XYZ".to_string()]);
        let json: serde_json::Value = serde_json::from_str(&message).unwrap();
        assert_eq!(json["type"], "sub");
        assert_eq!(json["topic"], "stockRealtimeBySymbols");
        assert_eq!(json["component"], "priceTable");
        assert_eq!(json["variables"][1], "XYZ");
    }

    #[tokio::test]
    async fn test_engine_subscribes_and_applies_updates() {
        let (tx, rx) = mpsc::channel(16);
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = Arc::new(MockTransport {
            incoming: Mutex::new(vec![rx]),
            sent: Arc::clone(&sent),
        });

        let mut engine =
            RealtimeEngine::new(test_config(), vec![StockRow::empty("ABC"), StockRow::empty("XYZ")]);
        let before = engine.rows();
        engine.start(transport);

        tx.send("STOCK|HOSE#ABC|12.5|0.3|2.46|100|200|12.4|12.6".to_string())
            .await
            .unwrap();
        tx.send("STOCK|HOSE#GHOST|9.9||||||".to_string())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let rows = engine.rows();
        assert!(!Arc::ptr_eq(&before, &rows));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].p, 12500.0);

        let sent = sent.lock().clone();
        assert_eq!(sent.len(), 1);
        let sub: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(sub["variables"][0], "ABC");

        engine.shutdown().await;
        assert_eq!(engine.status(), FeedStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_pending_reconnect() {
        // transport yields one connection, then refuses: after the peer
        // closes, the engine sits in its reconnect wait
        let (tx, rx) = mpsc::channel::<String>(1);
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = Arc::new(MockTransport {
            incoming: Mutex::new(vec![rx]),
            sent,
        });

        let mut engine = RealtimeEngine::new(
            RealtimeConfig {
                reconnect_delay: Duration::from_secs(3600),
                ..test_config()
            },
            vec![StockRow::empty("ABC")],
        );
        engine.start(transport);
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(tx); // peer closes
        tokio::time::sleep(Duration::from_millis(20)).await;

        // must return promptly despite the hour-long reconnect delay
        tokio::time::timeout(Duration::from_secs(1), engine.shutdown())
            .await
            .expect("shutdown not blocked by reconnect timer");
    }

    #[tokio::test]
    async fn test_buffered_updates_survive_connection_drop() {
        // conn 1 delivers one update and drops before the flush deadline
        // fires; conn 2 stays silent, so only the drop itself can flush
        let (tx1, rx1) = mpsc::channel::<String>(4);
        let (_tx2, rx2) = mpsc::channel::<String>(4);
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport = Arc::new(MockTransport {
            incoming: Mutex::new(vec![rx1, rx2]),
            sent,
        });

        let mut engine = RealtimeEngine::new(
            RealtimeConfig {
                flush_interval: Duration::from_millis(60_000),
                reconnect_delay: Duration::from_millis(10),
                ..RealtimeConfig::default()
            },
            vec![StockRow::empty("ABC")],
        );
        engine.start(transport);

        tx1.send("STOCK|HOSE#ABC|12.5|0.3|2.46|100|200|12.4|12.6".to_string())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(tx1); // peer closes with the flush still pending
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(engine.rows()[0].p, 12500.0);
        engine.shutdown().await;
    }
}
