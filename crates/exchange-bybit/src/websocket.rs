//! WebSocket transport for the Bybit v5 public stream.
//!
//! Thin connection wrapper: the reconnect policy lives in
//! [`crate::stream::StreamCollector`], which recreates this object on every
//! attempt rather than mutating a stale connection.

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub struct BybitWebSocket {
    ws_url: String,
    stream: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl BybitWebSocket {
    /// Creates a new, unconnected WebSocket client.
    #[must_use]
    pub fn new(ws_url: String) -> Self {
        Self {
            ws_url,
            stream: None,
        }
    }

    /// Connects to the realtime endpoint.
    ///
    /// # Errors
    /// Returns error if connection fails or the server is unreachable.
    pub async fn connect(&mut self) -> Result<()> {
        tracing::debug!("Attempting WebSocket connection to: {}", self.ws_url);

        let (ws_stream, response) = connect_async(&self.ws_url).await.map_err(|e| {
            tracing::error!("WebSocket connection error: {}", e);
            anyhow::anyhow!("Failed to connect to WebSocket at {}: {}", self.ws_url, e)
        })?;

        self.stream = Some(ws_stream);
        tracing::info!(
            "WebSocket connected to {} (HTTP status: {})",
            self.ws_url,
            response.status()
        );
        Ok(())
    }

    /// Sends a subscription request. Fire-and-forget: no ack is awaited.
    ///
    /// # Errors
    /// Returns error if the WebSocket is not connected or the send fails.
    pub async fn subscribe(&mut self, subscription: &serde_json::Value) -> Result<()> {
        if let Some(stream) = &mut self.stream {
            let msg = Message::Text(subscription.to_string());
            stream.send(msg).await?;
            Ok(())
        } else {
            anyhow::bail!("WebSocket not connected")
        }
    }

    /// Receives the next parsed JSON frame.
    ///
    /// Returns `Ok(None)` when the connection is closed by the remote end or
    /// the stream ends. Malformed text frames are logged and skipped, never
    /// surfaced: a bad message must not tear down the connection. Pings are
    /// answered inline.
    ///
    /// # Errors
    /// Returns error only on transport failures.
    pub async fn next_frame(&mut self) -> Result<Option<serde_json::Value>> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("WebSocket not connected"))?;

        while let Some(msg) = stream.next().await {
            match msg? {
                Message::Text(text) => match serde_json::from_str(&text) {
                    Ok(json) => return Ok(Some(json)),
                    Err(e) => {
                        tracing::warn!(error = %e, "discarding malformed stream message");
                    }
                },
                Message::Ping(data) => {
                    stream.send(Message::Pong(data)).await?;
                    tracing::trace!("Answered ping from server");
                }
                Message::Pong(_) => {
                    tracing::trace!("Received pong from server");
                }
                Message::Close(_) => {
                    tracing::warn!("WebSocket closed by remote end");
                    return Ok(None);
                }
                _ => {}
            }
        }

        Ok(None)
    }

    /// Closes the connection gracefully, ignoring close-time errors.
    pub async fn close(&mut self) {
        if let Some(stream) = &mut self.stream {
            let _ = stream.close(None).await;
        }
        self.stream = None;
    }
}
