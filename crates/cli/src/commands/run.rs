//! Full pipeline: one batch analysis cycle, then the realtime stream.
//!
//! Every batch stage is isolated. A failed fetch, store, or news pull logs
//! the error and the cycle continues with what it has; the signal is still
//! produced from whatever stages succeeded. An unreachable database only
//! disables persistence, it never stops the cycle or the stream.

use anyhow::Result;
use market_signal_analysis::{
    aggregate, decide, detect_patterns, mean_sentiment, NewsClient, OhlcSeries,
};
use market_signal_bybit::{BybitClient, StreamCollector, StreamConfig};
use market_signal_core::{AppConfig, ConfigLoader};
use market_signal_data::DatabaseClient;
use tokio::sync::mpsc;

pub async fn execute(config_path: &str) -> Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
    config.validate()?;

    let database =
        DatabaseClient::try_new(&config.database.url, config.database.max_connections).await;

    let client = BybitClient::new(config.bybit.rest_url(), &config.bybit.api_key);
    run_batch_cycle(&config, &client, database.as_ref()).await;

    run_stream(&config).await
}

/// One batch cycle. Returns the signal it produced, degrading per stage.
pub async fn run_batch_cycle(
    config: &AppConfig,
    client: &BybitClient,
    database: Option<&DatabaseClient>,
) -> market_signal_analysis::Signal {
    let market = &config.market;

    let candles = match client
        .fetch_candles(&market.symbol, &market.interval, market.candle_limit)
        .await
    {
        Ok(candles) => {
            if let Some(db) = database {
                if let Err(e) = db.upsert_candles(&candles).await {
                    tracing::error!(error = %e, "failed to store candles");
                }
            }
            candles
        }
        Err(e) => {
            tracing::error!(symbol = %market.symbol, error = %e, "candle fetch failed");
            Vec::new()
        }
    };

    match client
        .fetch_orderbook(&market.symbol, market.orderbook_depth)
        .await
    {
        Ok(snapshot) => {
            if let Some(db) = database {
                if let Err(e) = db.insert_orderbook(&snapshot).await {
                    tracing::error!(error = %e, "failed to store order book snapshot");
                }
            }
        }
        Err(e) => {
            tracing::error!(symbol = %market.symbol, error = %e, "order book fetch failed");
        }
    }

    let series = OhlcSeries::from_candles(&candles);
    let patterns = detect_patterns(&series);
    let score = aggregate(&patterns);

    // News failure is non-fatal: a neutral sentiment of 0.0 keeps the
    // decision driven by patterns alone.
    let sentiment = match NewsClient::new(&config.news).analyze().await {
        Ok(samples) => mean_sentiment(&samples),
        Err(e) => {
            tracing::warn!(error = %e, "news analysis failed, using neutral sentiment");
            0.0
        }
    };

    let signal = decide(score.bullish_count, score.bearish_count, sentiment);
    tracing::info!(
        symbol = %market.symbol,
        bullish = score.bullish_count,
        bearish = score.bearish_count,
        sentiment = format!("{sentiment:.4}"),
        signal = %signal,
        "batch cycle complete"
    );
    signal
}

/// Runs the realtime stream until Ctrl-C.
async fn run_stream(config: &AppConfig) -> Result<()> {
    let stream_config = StreamConfig::new(
        config.market.symbol.clone(),
        config.market.interval.clone(),
        config.market.orderbook_depth,
    );
    let (update_tx, mut update_rx) = mpsc::channel(256);
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

    let mut collector =
        StreamCollector::new(config.bybit.ws_url().to_string(), stream_config, update_tx);
    let collector_handle = tokio::spawn(async move { collector.run(shutdown_rx).await });

    let observer_handle = tokio::spawn(async move {
        while let Some(update) = update_rx.recv().await {
            let topic = update
                .get("topic")
                .and_then(|t| t.as_str())
                .unwrap_or("<none>");
            tracing::debug!(topic, "stream update");
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    let _ = shutdown_tx.send(()).await;

    collector_handle.await??;
    observer_handle.await?;
    Ok(())
}
