//! Aggregation of per-candle pattern scores into bullish/bearish counts.

use crate::patterns::PatternScoreSet;

/// Pattern names whose strictly-positive entries count as bullish evidence.
pub const BULLISH_PATTERNS: [&str; 5] = [
    "hammer",
    "inverted_hammer",
    "engulfing",
    "morning_star",
    "bullish_harami",
];

/// Pattern names whose strictly-negative entries count as bearish evidence.
pub const BEARISH_PATTERNS: [&str; 3] = ["shooting_star", "evening_star", "bearish_harami"];

/// Counts of pattern detections summed across a whole series.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AggregateScore {
    pub bullish_count: usize,
    pub bearish_count: usize,
}

/// Aggregates a pattern score set into bullish and bearish counts.
///
/// Counts strictly-positive entries across the bullish pattern group and
/// strictly-negative entries across the bearish group. A pattern name absent
/// from the set contributes zero. Pure and order-independent across names.
#[must_use]
pub fn aggregate(patterns: &PatternScoreSet) -> AggregateScore {
    let bullish_count = BULLISH_PATTERNS
        .iter()
        .filter_map(|name| patterns.get(*name))
        .flatten()
        .filter(|score| **score > 0)
        .count();

    let bearish_count = BEARISH_PATTERNS
        .iter()
        .filter_map(|name| patterns.get(*name))
        .flatten()
        .filter(|score| **score < 0)
        .count();

    AggregateScore {
        bullish_count,
        bearish_count,
    }
}
