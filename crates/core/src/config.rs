use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Bybit v5 REST endpoints.
pub const BYBIT_MAINNET_URL: &str = "https://api.bybit.com";
pub const BYBIT_TESTNET_URL: &str = "https://api-testnet.bybit.com";

/// Bybit v5 public linear WebSocket endpoints.
pub const BYBIT_MAINNET_WS_URL: &str = "wss://stream.bybit.com/v5/public/linear";
pub const BYBIT_TESTNET_WS_URL: &str = "wss://stream-testnet.bybit.com/v5/public/linear";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bybit: BybitConfig,
    pub database: DatabaseConfig,
    pub market: MarketConfig,
    pub news: NewsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BybitConfig {
    pub api_key: String,
    pub api_secret: String,
    /// Selects testnet vs mainnet REST and WebSocket endpoints.
    pub testnet: bool,
}

impl BybitConfig {
    /// Returns the REST base URL for the configured environment.
    #[must_use]
    pub fn rest_url(&self) -> &'static str {
        if self.testnet {
            BYBIT_TESTNET_URL
        } else {
            BYBIT_MAINNET_URL
        }
    }

    /// Returns the WebSocket URL for the configured environment.
    #[must_use]
    pub fn ws_url(&self) -> &'static str {
        if self.testnet {
            BYBIT_TESTNET_WS_URL
        } else {
            BYBIT_MAINNET_WS_URL
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Trading pair symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Candle interval in Bybit notation (e.g., "1" for 1 minute)
    pub interval: String,
    /// Number of candles to fetch per batch cycle (Bybit max: 200)
    pub candle_limit: u32,
    /// Number of order book levels to fetch (Bybit max: 200)
    pub orderbook_depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// JSON news endpoint returning `{"results": [{"title", "description"}]}`
    pub endpoint: String,
    /// Maximum number of headlines scored per cycle
    pub max_headlines: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bybit: BybitConfig {
                api_key: String::new(),
                api_secret: String::new(),
                testnet: true,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/market_signal".to_string(),
                max_connections: 10,
            },
            market: MarketConfig {
                symbol: "BTCUSDT".to_string(),
                interval: "1".to_string(),
                candle_limit: 200,
                orderbook_depth: 50,
            },
            news: NewsConfig {
                endpoint: "https://cryptopanic.com/api/v1/posts/".to_string(),
                max_headlines: 20,
            },
        }
    }
}

impl AppConfig {
    /// Validates startup-critical settings.
    ///
    /// Missing API credentials are the only fatal condition; everything else
    /// degrades at runtime per stage.
    ///
    /// # Errors
    /// Returns an error if the API key or secret is empty.
    pub fn validate(&self) -> Result<()> {
        if self.bybit.api_key.is_empty() || self.bybit.api_secret.is_empty() {
            bail!("Bybit API key and secret must be set (config file or APP_BYBIT_* env vars)");
        }
        Ok(())
    }
}
