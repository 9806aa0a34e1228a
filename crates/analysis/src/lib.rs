//! Analysis modules for the market signal pipeline.
//!
//! This crate provides the two analytical views that feed the signal
//! decision:
//! - Candlestick pattern classification over an OHLC series, producing
//!   per-candle signed scores per pattern name
//! - News headline sentiment scoring with a polarity lexicon
//!
//! plus the pure aggregation and decision functions that merge both views
//! into one discrete trading action.

pub mod news;
pub mod patterns;
pub mod score;
pub mod sentiment;
pub mod signal;

pub use news::NewsClient;
pub use patterns::{detect_patterns, OhlcSeries, PatternScoreSet};
pub use score::{aggregate, AggregateScore, BEARISH_PATTERNS, BULLISH_PATTERNS};
pub use sentiment::{mean_sentiment, score_text};
pub use signal::{decide, Signal, SENTIMENT_BUY_THRESHOLD, SENTIMENT_SELL_THRESHOLD};
