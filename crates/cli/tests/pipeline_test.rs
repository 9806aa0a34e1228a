use market_signal_analysis::{aggregate, decide, detect_patterns, OhlcSeries, Signal};
use market_signal_bybit::market::parse_kline_rows;
use serde_json::json;

/// Raw kline rows flow through parsing, pattern detection, aggregation, and
/// the decision rule without touching the network or the database.
#[test]
fn test_kline_rows_to_signal() {
    // Second candle is a hammer: long lower shadow, small body near the top.
    let rows = vec![
        json!(["1700000000000", "99.0", "100.2", "98.9", "100.0", "10.0", "990"]),
        json!(["1700000060000", "100.0", "100.6", "97.0", "100.5", "12.0", "1200"]),
    ];

    let candles = parse_kline_rows("BTCUSDT", "1", &rows);
    assert_eq!(candles.len(), 2);

    let series = OhlcSeries::from_candles(&candles);
    let patterns = detect_patterns(&series);
    assert_eq!(patterns["hammer"], vec![0, 100]);

    let score = aggregate(&patterns);
    assert_eq!(score.bullish_count, 1);
    assert_eq!(score.bearish_count, 0);

    assert_eq!(decide(score.bullish_count, score.bearish_count, 0.3), Signal::Buy);
    assert_eq!(decide(score.bullish_count, score.bearish_count, 0.1), Signal::Neutral);
}

/// A batch with no usable rows degrades to an empty series and a neutral
/// signal instead of failing.
#[test]
fn test_unparseable_batch_degrades_to_neutral() {
    let rows = vec![json!(["not-a-timestamp", "x", "y", "z", "w", "v", "u"])];
    let candles = parse_kline_rows("BTCUSDT", "1", &rows);
    assert!(candles.is_empty());

    let patterns = detect_patterns(&OhlcSeries::from_candles(&candles));
    let score = aggregate(&patterns);
    assert_eq!(decide(score.bullish_count, score.bearish_count, 0.0), Signal::Neutral);
}
