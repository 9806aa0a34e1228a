pub mod config;
pub mod config_loader;
pub mod error;
pub mod types;

pub use config::{AppConfig, BybitConfig, DatabaseConfig, MarketConfig, NewsConfig};
pub use config_loader::ConfigLoader;
pub use error::MarketDataError;
pub use types::{Candle, OrderBookSnapshot, PriceLevel, SentimentSample};
