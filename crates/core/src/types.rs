//! Domain types shared across the pipeline.
//!
//! Candles and order book snapshots are created per fetch cycle, handed to
//! the persistence gateway, then dropped; durable storage owns them after
//! that point.

use serde::{Deserialize, Serialize};

/// One OHLCV candlestick.
///
/// `(symbol, interval, open_time)` uniquely identifies a candle; re-fetching
/// the same key overwrites the stored record rather than duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub symbol: String,
    pub interval: String,
    /// Candle open time in epoch milliseconds, strictly increasing within a
    /// fetch batch.
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A single price level in the order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub size: f64,
}

/// Point-in-time order book state.
///
/// Bids are ordered descending by price, asks ascending; no two entries on
/// the same side share a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub symbol: String,
    /// Snapshot timestamp in epoch milliseconds.
    pub timestamp: i64,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl OrderBookSnapshot {
    /// Best bid price, if any levels exist.
    #[must_use]
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }

    /// Best ask price, if any levels exist.
    #[must_use]
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }
}

/// A scored news headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSample {
    pub headline: String,
    /// Compound polarity score in [-1, 1].
    pub compound_score: f64,
}
