use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "market-signal")]
#[command(about = "Bybit market data ingestion and signal pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: fetch, analyze, persist, then stream
    Run {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
    /// Fetch historical candles and print the resulting signal
    Fetch {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Trading pair symbol (overrides config)
        #[arg(long)]
        symbol: Option<String>,
        /// Kline interval in Bybit notation (overrides config)
        #[arg(long)]
        interval: Option<String>,
        /// Number of candles to request (overrides config)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Stream realtime kline and order book updates to stdout logging
    Stream {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Run { config } => commands::run::execute(&config).await,
        Commands::Fetch {
            config,
            symbol,
            interval,
            limit,
        } => commands::fetch::execute(&config, symbol, interval, limit).await,
        Commands::Stream { config } => commands::stream::execute(&config).await,
    }
}
