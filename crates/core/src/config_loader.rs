use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging defaults, TOML, and
    /// `APP_`-prefixed environment variables (e.g. `APP_BYBIT__API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads application configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = ConfigLoader::load_from("does/not/exist.toml").unwrap();
            assert_eq!(config.market.symbol, "BTCUSDT");
            assert_eq!(config.market.candle_limit, 200);
            Ok(())
        });
    }

    #[test]
    fn test_load_merges_toml_over_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "Config.toml",
                r#"
                [bybit]
                api_key = "test-key"
                api_secret = "test-secret"
                testnet = false

                [market]
                symbol = "ETHUSDT"
                "#,
            )?;

            let config = ConfigLoader::load_from("Config.toml").unwrap();
            assert_eq!(config.bybit.api_key, "test-key");
            assert!(!config.bybit.testnet);
            assert_eq!(config.market.symbol, "ETHUSDT");
            // Untouched sections keep their defaults
            assert_eq!(config.market.interval, "1");
            assert_eq!(config.database.max_connections, 10);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "Config.toml",
                r#"
                [market]
                symbol = "ETHUSDT"
                "#,
            )?;
            jail.set_env("APP_MARKET__SYMBOL", "SOLUSDT");

            let config = ConfigLoader::load_from("Config.toml").unwrap();
            assert_eq!(config.market.symbol, "SOLUSDT");
            Ok(())
        });
    }
}
