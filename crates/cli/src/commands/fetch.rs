//! One-shot historical fetch with signal output, no persistence.

use anyhow::Result;
use market_signal_analysis::{aggregate, decide, detect_patterns, OhlcSeries};
use market_signal_bybit::BybitClient;
use market_signal_core::ConfigLoader;

pub async fn execute(
    config_path: &str,
    symbol: Option<String>,
    interval: Option<String>,
    limit: Option<u32>,
) -> Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    let symbol = symbol.unwrap_or(config.market.symbol);
    let interval = interval.unwrap_or(config.market.interval);
    let limit = limit.unwrap_or(config.market.candle_limit);

    let client = BybitClient::new(config.bybit.rest_url(), &config.bybit.api_key);
    let candles = client.fetch_candles(&symbol, &interval, limit).await?;

    let series = OhlcSeries::from_candles(&candles);
    let patterns = detect_patterns(&series);
    let score = aggregate(&patterns);
    // Batch-only view: no news feed consulted, sentiment stays neutral.
    let signal = decide(score.bullish_count, score.bearish_count, 0.0);

    println!("symbol:    {symbol}");
    println!("interval:  {interval}");
    println!("candles:   {}", candles.len());
    if let Some(latest) = candles.last() {
        println!("latest:    open_time={} close={}", latest.open_time, latest.close);
    }
    println!("bullish:   {}", score.bullish_count);
    println!("bearish:   {}", score.bearish_count);
    println!("signal:    {signal}");
    Ok(())
}
