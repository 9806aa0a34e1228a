pub mod client;
pub mod market;
pub mod stream;
pub mod websocket;

pub use client::BybitClient;
pub use stream::{StreamCollector, StreamConfig, StreamStats};
pub use websocket::BybitWebSocket;
