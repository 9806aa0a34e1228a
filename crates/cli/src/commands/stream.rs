//! Standalone realtime stream: subscribe and log every update until Ctrl-C.

use anyhow::Result;
use market_signal_bybit::{StreamCollector, StreamConfig};
use market_signal_core::ConfigLoader;
use tokio::sync::mpsc;

pub async fn execute(config_path: &str) -> Result<()> {
    let config = ConfigLoader::load_from(config_path)?;
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
            tracing::info!(topic, payload = %update, "stream update");
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    let _ = shutdown_tx.send(()).await;

    collector_handle.await??;
    observer_handle.await?;
    Ok(())
}
