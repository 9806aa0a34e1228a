//! Trading signal decision.

use std::fmt;

/// Sentiment must be strictly greater than this for a BUY.
pub const SENTIMENT_BUY_THRESHOLD: f64 = 0.2;

/// Sentiment must be strictly less than this for a SELL.
pub const SENTIMENT_SELL_THRESHOLD: f64 = -0.2;

/// Discrete trading action. Derived, never stored; recomputed each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Neutral,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Merges aggregated pattern polarity and mean news sentiment into one action.
///
/// BUY requires a strict bullish majority and sentiment strictly above the
/// buy threshold; SELL the mirror. Everything else, including count ties, is
/// NEUTRAL. Pure and stateless: every invocation is independent of prior
/// decisions.
#[must_use]
pub fn decide(bullish_count: usize, bearish_count: usize, sentiment_mean: f64) -> Signal {
    if bullish_count > bearish_count && sentiment_mean > SENTIMENT_BUY_THRESHOLD {
        Signal::Buy
    } else if bearish_count > bullish_count && sentiment_mean < SENTIMENT_SELL_THRESHOLD {
        Signal::Sell
    } else {
        Signal::Neutral
    }
}
