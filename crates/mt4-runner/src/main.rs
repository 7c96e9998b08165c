//! # mt4-runner
//!
//! Main entry point for the pump gateway.
//!
//! Loads a JSON configuration file, builds the pump pool with the
//! configured terminal connector, and runs it until Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! mt4-runner config.json --log-level info
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mt4_core::{QuoteUpdate, TradeRecord, TransactionType};
use mt4_pump::{PumpPool, QuoteSink, TradeSink};
use tracing::info;

/// MT4 Pump Gateway Runner.
#[derive(Parser)]
#[command(name = "mt4-runner", about = "MT4 Pump Gateway Runner")]
struct Cli {
    /// Configuration file path (JSON).
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output (overrides the config's
    /// `log_path`).
    #[arg(long)]
    log_dir: Option<String>,
}

/// Demo consumer that logs every forwarded event.
///
/// Stands in for the real downstream servers (copy trading, persistence),
/// which attach here as additional sinks.
struct LogSink;

impl TradeSink for LogSink {
    fn on_new_trade(&self, transaction_type: TransactionType, record: &TradeRecord) -> Result<()> {
        info!(
            "trade {transaction_type} order={} login={} {} vol={} profit={}",
            record.order_id, record.login, record.symbol, record.volume, record.profit
        );
        Ok(())
    }
}

impl QuoteSink for LogSink {
    fn on_new_quote(&self, quote: &QuoteUpdate) -> Result<()> {
        info!("quote {} bid={} ask={}", quote.symbol, quote.bid, quote.ask);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration first; file-log placement depends on it.
    let config = mt4_core::config::load_config(&cli.config)?;

    // 2. Initialize logging. The guard must outlive the pool.
    let log_dir = cli.log_dir.as_deref().or(config.log_path.as_deref());
    let _guard = mt4_core::logging::init_logging(&cli.log_level, log_dir, config.module_name());

    info!(
        "mt4-runner starting, config={}, log_level={}",
        cli.config.display(),
        cli.log_level
    );

    // 3. Build the pool with the configured terminal connector.
    let connector = mt4_pump::registry::create_connector(&config.pump)?;
    let mut pool = PumpPool::new(config.pump.clone(), connector)?;

    let demo_sink = Arc::new(LogSink);
    pool.add_trade_sink(demo_sink.clone());
    pool.add_quote_sink(demo_sink);

    // 4. Start pumping
    pool.start().await?;
    info!(
        "pump pool running with {} pump(s) on terminal '{}', press Ctrl+C to stop",
        config.pump.pump_count, config.pump.terminal
    );

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    // 6. Stop gracefully; stop() returns once the queue is drained.
    pool.stop().await;

    info!("mt4-runner stopped, goodbye");
    Ok(())
}
