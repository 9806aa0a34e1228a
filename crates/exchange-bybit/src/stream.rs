//! Realtime stream collector.
//!
//! Maintains one live subscription to the kline and order book channels for
//! the lifetime of the process: connect, subscribe, receive, and on any drop
//! reconnect after a fixed delay. The loop is explicit and bounded only by
//! the configured attempt cap (0 = retry forever); termination otherwise
//! happens through the shutdown channel, observed both mid-stream and
//! between attempts.
//!
//! The collector does not branch on payload type. Every parsed frame is
//! forwarded on the output channel; demultiplexing kline vs order book
//! updates is the observer's job.

use crate::websocket::BybitWebSocket;
use anyhow::Result;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;

/// Configuration for the stream collector.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Trading pair symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Kline interval in Bybit notation (e.g., "1")
    pub interval: String,
    /// Order book depth level
    pub depth: u32,
    /// Delay before reconnection attempts
    pub reconnect_delay: Duration,
    /// Maximum reconnection attempts before giving up (0 = unlimited)
    pub max_reconnect_attempts: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            interval: "1".to_string(),
            depth: 50,
            reconnect_delay: Duration::from_secs(5),
            max_reconnect_attempts: 0,
        }
    }
}

impl StreamConfig {
    /// Creates a config for a specific symbol/interval/depth combination.
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, depth: u32) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            depth,
            ..Default::default()
        }
    }

    /// Sets the reconnect delay.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the maximum reconnect attempts.
    #[must_use]
    pub fn with_max_reconnect_attempts(mut self, max: u32) -> Self {
        self.max_reconnect_attempts = max;
        self
    }
}

/// Statistics for a running stream collector.
#[derive(Debug, Clone, Default)]
pub struct StreamStats {
    /// Frames forwarded to the observer since start
    pub updates_forwarded: u64,
    /// Transport errors encountered
    pub errors_encountered: u64,
    /// Number of reconnections
    pub reconnections: u32,
}

/// How one connection attempt ended.
enum StreamExit {
    Shutdown,
    Disconnected,
}

pub struct StreamCollector {
    ws_url: String,
    config: StreamConfig,
    tx: mpsc::Sender<serde_json::Value>,
    stats: StreamStats,
}

impl StreamCollector {
    /// Creates a new collector forwarding parsed frames on `tx`.
    #[must_use]
    pub fn new(ws_url: String, config: StreamConfig, tx: mpsc::Sender<serde_json::Value>) -> Self {
        Self {
            ws_url,
            config,
            tx,
            stats: StreamStats::default(),
        }
    }

    /// Returns a reference to the current statistics.
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// The fixed subscription payload sent once per successful connect.
    #[must_use]
    pub fn subscription_payload(&self) -> serde_json::Value {
        json!({
            "op": "subscribe",
            "args": [
                format!("kline.{}.{}", self.config.interval, self.config.symbol),
                format!("orderbook.{}.{}", self.config.depth, self.config.symbol),
            ]
        })
    }

    /// Runs the connect/subscribe/receive loop until shutdown.
    ///
    /// # Errors
    /// Returns an error only when the configured attempt cap is exhausted.
    pub async fn run(&mut self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<()> {
        let mut attempts = 0u32;

        loop {
            if shutdown_rx.try_recv().is_ok() {
                tracing::info!("stream shutdown requested");
                break;
            }

            match self.collect(&mut shutdown_rx).await {
                Ok(StreamExit::Shutdown) => {
                    tracing::info!("stream collector exiting cleanly");
                    break;
                }
                Ok(StreamExit::Disconnected) => {
                    tracing::warn!(symbol = %self.config.symbol, "stream disconnected");
                }
                Err(e) => {
                    self.stats.errors_encountered += 1;
                    tracing::error!(symbol = %self.config.symbol, error = %e, "stream error");
                }
            }

            attempts += 1;
            if self.config.max_reconnect_attempts > 0
                && attempts >= self.config.max_reconnect_attempts
            {
                anyhow::bail!(
                    "max reconnect attempts ({}) reached",
                    self.config.max_reconnect_attempts
                );
            }

            self.stats.reconnections += 1;
            tracing::info!(
                delay = ?self.config.reconnect_delay,
                attempt = attempts,
                "reconnecting after delay"
            );
            tokio::select! {
                () = tokio::time::sleep(self.config.reconnect_delay) => {}
                _ = shutdown_rx.recv() => {
                    tracing::info!("stream shutdown requested during backoff");
                    break;
                }
            }
        }

        Ok(())
    }

    /// One connection attempt: connect, subscribe, receive until drop.
    async fn collect(&mut self, shutdown_rx: &mut mpsc::Receiver<()>) -> Result<StreamExit> {
        let mut ws = BybitWebSocket::new(self.ws_url.clone());
        ws.connect().await?;
        ws.subscribe(&self.subscription_payload()).await?;
        tracing::info!(
            symbol = %self.config.symbol,
            interval = %self.config.interval,
            depth = self.config.depth,
            "subscribed to realtime channels"
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    ws.close().await;
                    return Ok(StreamExit::Shutdown);
                }
                frame = ws.next_frame() => {
                    match frame? {
                        Some(update) => {
                            if self.tx.send(update).await.is_err() {
                                tracing::info!("update channel closed, exiting");
                                return Ok(StreamExit::Shutdown);
                            }
                            self.stats.updates_forwarded += 1;
                        }
                        None => return Ok(StreamExit::Disconnected),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.reconnect_delay, Duration::from_secs(5));
        assert_eq!(config.max_reconnect_attempts, 0);
    }

    #[test]
    fn test_subscription_payload_shape() {
        let (tx, _rx) = mpsc::channel(1);
        let collector = StreamCollector::new(
            "wss://example.invalid".to_string(),
            StreamConfig::new("BTCUSDT", "1", 50),
            tx,
        );

        let payload = collector.subscription_payload();
        assert_eq!(payload["op"], "subscribe");
        assert_eq!(payload["args"][0], "kline.1.BTCUSDT");
        assert_eq!(payload["args"][1], "orderbook.50.BTCUSDT");
    }

    #[tokio::test]
    async fn test_reconnect_resubscribes_after_closure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (sub_tx, mut sub_rx) = mpsc::channel::<String>(4);

        // Fake exchange: first connection is closed right after the
        // subscription arrives, second one serves a single update.
        tokio::spawn(async move {
            for round in 0..2 {
                let (socket, _) = listener.accept().await.unwrap();
                let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();

                if let Some(Ok(Message::Text(text))) = ws.next().await {
                    let _ = sub_tx.send(text).await;
                }

                if round == 0 {
                    let _ = ws.close(None).await;
                } else {
                    // A malformed frame first: it must be skipped without
                    // tearing down the connection.
                    let _ = ws.send(Message::Text("{not json".to_string())).await;
                    let _ = ws
                        .send(Message::Text(
                            r#"{"topic":"kline.1.BTCUSDT","data":[]}"#.to_string(),
                        ))
                        .await;
                    while ws.next().await.is_some() {}
                }
            }
        });

        let config = StreamConfig::new("BTCUSDT", "1", 50)
            .with_reconnect_delay(Duration::from_millis(50));
        let (tx, mut rx) = mpsc::channel(8);
        let mut collector = StreamCollector::new(format!("ws://{addr}"), config, tx);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let handle = tokio::spawn(async move { collector.run(shutdown_rx).await });

        let timeout = Duration::from_secs(5);
        let first_sub = tokio::time::timeout(timeout, sub_rx.recv())
            .await
            .unwrap()
            .unwrap();
        let second_sub = tokio::time::timeout(timeout, sub_rx.recv())
            .await
            .unwrap()
            .unwrap();

        // Exactly one identical subscription per successful connect
        assert_eq!(first_sub, second_sub);
        let payload: serde_json::Value = serde_json::from_str(&first_sub).unwrap();
        assert_eq!(payload["op"], "subscribe");
        assert_eq!(payload["args"][0], "kline.1.BTCUSDT");

        let update = tokio::time::timeout(timeout, rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update["topic"], "kline.1.BTCUSDT");

        shutdown_tx.send(()).await.unwrap();
        tokio::time::timeout(timeout, handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_attempt_cap_stops_collector() {
        // Nothing listens on this address, so every attempt fails fast.
        let config = StreamConfig::new("BTCUSDT", "1", 50)
            .with_reconnect_delay(Duration::from_millis(10))
            .with_max_reconnect_attempts(2);
        let (tx, _rx) = mpsc::channel(1);
        let mut collector =
            StreamCollector::new("ws://127.0.0.1:9".to_string(), config, tx);
        let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let result = collector.run(shutdown_rx).await;
        assert!(result.is_err());
        assert_eq!(collector.stats().errors_encountered, 2);
    }
}
