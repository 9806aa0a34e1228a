//! Candlestick pattern classification.
//!
//! Detects a fixed set of single- and multi-candle reversal patterns over an
//! aligned OHLC series. Each detector emits a TA-Lib-style signed score per
//! candle: +100 for a bullish detection, -100 for a bearish one, 0 for none.
//!
//! The `bearish_harami` series is the negation of the harami-cross detector's
//! raw output, so that "bearish" always reads as non-positive.

use market_signal_core::Candle;
use std::collections::BTreeMap;

/// Mapping from pattern name to a signed score series aligned
/// index-for-index with the input candles.
pub type PatternScoreSet = BTreeMap<String, Vec<i32>>;

/// Aligned open/high/low/close series of equal length.
#[derive(Debug, Clone, Default)]
pub struct OhlcSeries {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl OhlcSeries {
    /// Builds a series from a candle batch.
    #[must_use]
    pub fn from_candles(candles: &[Candle]) -> Self {
        Self {
            open: candles.iter().map(|c| c.open).collect(),
            high: candles.iter().map(|c| c.high).collect(),
            low: candles.iter().map(|c| c.low).collect(),
            close: candles.iter().map(|c| c.close).collect(),
        }
    }

    /// Number of candles, or `None` if the columns are misaligned.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        let n = self.open.len();
        if self.high.len() == n && self.low.len() == n && self.close.len() == n {
            Some(n)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

/// Runs all pattern detectors over the series.
///
/// Returns an empty set when the series is empty or the columns are
/// misaligned, rather than failing the caller.
#[must_use]
pub fn detect_patterns(series: &OhlcSeries) -> PatternScoreSet {
    let Some(n) = series.len() else {
        tracing::error!(
            "OHLC columns misaligned: open={} high={} low={} close={}",
            series.open.len(),
            series.high.len(),
            series.low.len(),
            series.close.len()
        );
        return PatternScoreSet::new();
    };
    if n == 0 {
        return PatternScoreSet::new();
    }

    let harami_cross = detect_harami_cross(series, n);
    let bearish_harami: Vec<i32> = harami_cross.iter().map(|s| -s).collect();

    let mut patterns = PatternScoreSet::new();
    patterns.insert("hammer".to_string(), detect_hammer(series, n));
    patterns.insert(
        "inverted_hammer".to_string(),
        detect_inverted_hammer(series, n),
    );
    patterns.insert("engulfing".to_string(), detect_engulfing(series, n));
    patterns.insert("doji".to_string(), detect_doji(series, n));
    patterns.insert(
        "shooting_star".to_string(),
        detect_shooting_star(series, n),
    );
    patterns.insert("morning_star".to_string(), detect_star(series, n, true));
    patterns.insert("evening_star".to_string(), detect_star(series, n, false));
    patterns.insert("bullish_harami".to_string(), detect_harami(series, n));
    patterns.insert("bearish_harami".to_string(), bearish_harami);
    patterns
}

fn body(o: f64, c: f64) -> f64 {
    (c - o).abs()
}

fn upper_shadow(o: f64, h: f64, c: f64) -> f64 {
    h - o.max(c)
}

fn lower_shadow(o: f64, l: f64, c: f64) -> f64 {
    o.min(c) - l
}

fn is_doji(o: f64, h: f64, l: f64, c: f64) -> bool {
    let range = h - l;
    range > 0.0 && body(o, c) <= 0.1 * range
}

fn detect_doji(s: &OhlcSeries, n: usize) -> Vec<i32> {
    (0..n)
        .map(|i| {
            if is_doji(s.open[i], s.high[i], s.low[i], s.close[i]) {
                100
            } else {
                0
            }
        })
        .collect()
}

fn detect_hammer(s: &OhlcSeries, n: usize) -> Vec<i32> {
    (0..n)
        .map(|i| {
            let (o, h, l, c) = (s.open[i], s.high[i], s.low[i], s.close[i]);
            let range = h - l;
            let b = body(o, c);
            if range > 0.0
                && b > 0.0
                && lower_shadow(o, l, c) >= 2.0 * b
                && upper_shadow(o, h, c) <= 0.25 * range
            {
                100
            } else {
                0
            }
        })
        .collect()
}

fn detect_inverted_hammer(s: &OhlcSeries, n: usize) -> Vec<i32> {
    (0..n)
        .map(|i| {
            let (o, h, l, c) = (s.open[i], s.high[i], s.low[i], s.close[i]);
            let range = h - l;
            let b = body(o, c);
            if range > 0.0
                && b > 0.0
                && upper_shadow(o, h, c) >= 2.0 * b
                && lower_shadow(o, l, c) <= 0.25 * range
            {
                100
            } else {
                0
            }
        })
        .collect()
}

/// Shooting star: an inverted-hammer shape after an up candle.
fn detect_shooting_star(s: &OhlcSeries, n: usize) -> Vec<i32> {
    (0..n)
        .map(|i| {
            if i == 0 {
                return 0;
            }
            let prev_bullish = s.close[i - 1] > s.open[i - 1];
            let (o, h, l, c) = (s.open[i], s.high[i], s.low[i], s.close[i]);
            let range = h - l;
            let b = body(o, c);
            if prev_bullish
                && range > 0.0
                && b > 0.0
                && upper_shadow(o, h, c) >= 2.0 * b
                && lower_shadow(o, l, c) <= 0.25 * range
            {
                -100
            } else {
                0
            }
        })
        .collect()
}

fn detect_engulfing(s: &OhlcSeries, n: usize) -> Vec<i32> {
    (0..n)
        .map(|i| {
            if i == 0 {
                return 0;
            }
            let (po, pc) = (s.open[i - 1], s.close[i - 1]);
            let (o, c) = (s.open[i], s.close[i]);
            let prev_body = body(po, pc);
            if prev_body <= 0.0 || body(o, c) <= prev_body {
                return 0;
            }
            let prev_bearish = pc < po;
            let prev_bullish = pc > po;
            if prev_bearish && c > o && o <= pc && c >= po {
                100
            } else if prev_bullish && c < o && o >= pc && c <= po {
                -100
            } else {
                0
            }
        })
        .collect()
}

/// Morning star (`bullish = true`) / evening star (`bullish = false`).
///
/// Three candles: a long directional candle, a small-bodied pause, then a
/// reversal candle closing past the midpoint of the first body.
fn detect_star(s: &OhlcSeries, n: usize, bullish: bool) -> Vec<i32> {
    (0..n)
        .map(|i| {
            if i < 2 {
                return 0;
            }
            let (o0, c0) = (s.open[i - 2], s.close[i - 2]);
            let (o1, c1) = (s.open[i - 1], s.close[i - 1]);
            let (o2, c2) = (s.open[i], s.close[i]);
            let body0 = body(o0, c0);
            if body0 <= 0.0 || body(o1, c1) > 0.5 * body0 {
                return 0;
            }
            let midpoint0 = (o0 + c0) / 2.0;
            if bullish {
                if c0 < o0 && c2 > o2 && c2 > midpoint0 {
                    100
                } else {
                    0
                }
            } else if c0 > o0 && c2 < o2 && c2 < midpoint0 {
                -100
            } else {
                0
            }
        })
        .collect()
}

/// Harami: a small body fully contained in the previous candle's body, in the
/// opposite direction.
fn detect_harami(s: &OhlcSeries, n: usize) -> Vec<i32> {
    (0..n)
        .map(|i| harami_at(s, i, false))
        .collect()
}

/// Harami cross: a harami whose second candle is a doji.
fn detect_harami_cross(s: &OhlcSeries, n: usize) -> Vec<i32> {
    (0..n)
        .map(|i| harami_at(s, i, true))
        .collect()
}

fn harami_at(s: &OhlcSeries, i: usize, require_doji: bool) -> i32 {
    if i == 0 {
        return 0;
    }
    let (po, pc) = (s.open[i - 1], s.close[i - 1]);
    let (o, h, l, c) = (s.open[i], s.high[i], s.low[i], s.close[i]);
    let prev_body = body(po, pc);
    if prev_body <= 0.0 || body(o, c) >= 0.5 * prev_body {
        return 0;
    }
    let contained = o.max(c) <= po.max(pc) && o.min(c) >= po.min(pc);
    if !contained {
        return 0;
    }
    if require_doji && !is_doji(o, h, l, c) {
        return 0;
    }
    if pc < po {
        100
    } else if pc > po {
        -100
    } else {
        0
    }
}
