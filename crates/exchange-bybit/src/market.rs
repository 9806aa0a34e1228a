//! Historical market data fetchers.
//!
//! Normalizes Bybit v5 kline and order book payloads into domain types.
//! Rows that fail numeric validation are dropped rather than aborting the
//! whole batch: partial data beats no data.

use crate::client::BybitClient;
use market_signal_core::{Candle, MarketDataError, OrderBookSnapshot, PriceLevel};
use serde_json::Value as JsonValue;

impl BybitClient {
    /// Fetches up to `limit` candles for a symbol/interval, most-recent last.
    ///
    /// # Errors
    /// Returns `DataUnavailable` when the upstream reports zero usable rows;
    /// transport and upstream failures propagate from the client.
    pub async fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let result = self
            .get_result(
                "/v5/market/kline",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                    ("category", "linear".to_string()),
                ],
            )
            .await?;

        let rows = result
            .get("list")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| MarketDataError::unavailable(format!("kline {symbol}/{interval}")))?;

        let candles = parse_kline_rows(symbol, interval, rows);
        if candles.is_empty() {
            return Err(MarketDataError::unavailable(format!(
                "kline {symbol}/{interval}"
            )));
        }

        tracing::info!(
            symbol,
            interval,
            count = candles.len(),
            dropped = rows.len() - candles.len(),
            "fetched candles"
        );
        Ok(candles)
    }

    /// Fetches an order book snapshot with up to `depth` levels per side.
    ///
    /// # Errors
    /// Returns `DataUnavailable` when both sides are empty, `Parse` when the
    /// snapshot timestamp is missing or non-numeric.
    pub async fn fetch_orderbook(
        &self,
        symbol: &str,
        depth: u32,
    ) -> Result<OrderBookSnapshot, MarketDataError> {
        let result = self
            .get_result(
                "/v5/market/orderbook",
                &[
                    ("symbol", symbol.to_string()),
                    ("limit", depth.to_string()),
                    ("category", "linear".to_string()),
                ],
            )
            .await?;

        let snapshot = parse_orderbook(symbol, &result)?;
        if snapshot.bids.is_empty() && snapshot.asks.is_empty() {
            return Err(MarketDataError::unavailable(format!("orderbook {symbol}")));
        }

        tracing::info!(
            symbol,
            bids = snapshot.bids.len(),
            asks = snapshot.asks.len(),
            "fetched order book"
        );
        Ok(snapshot)
    }
}

/// Parses kline rows `[start, open, high, low, close, volume, turnover]`,
/// dropping rows with non-numeric timestamps or prices.
///
/// Bybit returns rows newest first; the output is normalized to `open_time`
/// strictly increasing with the most recent candle last.
pub fn parse_kline_rows(symbol: &str, interval: &str, rows: &[JsonValue]) -> Vec<Candle> {
    let mut candles: Vec<Candle> = rows
        .iter()
        .filter_map(|row| {
            let candle = parse_kline_row(symbol, interval, row);
            if candle.is_none() {
                tracing::debug!(symbol, ?row, "dropping unparseable kline row");
            }
            candle
        })
        .collect();

    candles.sort_by_key(|c| c.open_time);
    candles
}

fn parse_kline_row(symbol: &str, interval: &str, row: &JsonValue) -> Option<Candle> {
    let fields = row.as_array()?;
    if fields.len() < 6 {
        return None;
    }

    Some(Candle {
        symbol: symbol.to_string(),
        interval: interval.to_string(),
        open_time: parse_i64(&fields[0])?,
        open: parse_f64(&fields[1])?,
        high: parse_f64(&fields[2])?,
        low: parse_f64(&fields[3])?,
        close: parse_f64(&fields[4])?,
        volume: parse_f64(&fields[5])?,
    })
}

/// Parses an order book result `{s, b, a, ts}` into a snapshot with bids
/// descending and asks ascending by price.
pub fn parse_orderbook(
    symbol: &str,
    result: &JsonValue,
) -> Result<OrderBookSnapshot, MarketDataError> {
    let timestamp = result
        .get("ts")
        .and_then(|v| parse_i64(v))
        .ok_or_else(|| MarketDataError::Parse("orderbook snapshot missing ts".to_string()))?;

    let mut bids = parse_levels(result.get("b"));
    let mut asks = parse_levels(result.get("a"));
    bids.sort_by(|a, b| b.price.total_cmp(&a.price));
    asks.sort_by(|a, b| a.price.total_cmp(&b.price));

    Ok(OrderBookSnapshot {
        symbol: symbol.to_string(),
        timestamp,
        bids,
        asks,
    })
}

fn parse_levels(levels: Option<&JsonValue>) -> Vec<PriceLevel> {
    let Some(rows) = levels.and_then(JsonValue::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let pair = row.as_array()?;
            if pair.len() < 2 {
                return None;
            }
            Some(PriceLevel {
                price: parse_f64(&pair[0])?,
                size: parse_f64(&pair[1])?,
            })
        })
        .collect()
}

fn parse_i64(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::String(s) => s.parse().ok(),
        JsonValue::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn parse_f64(value: &JsonValue) -> Option<f64> {
    let parsed = match value {
        JsonValue::String(s) => s.parse().ok(),
        JsonValue::Number(n) => n.as_f64(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}
