//! Maintenance tracker backend.
//!
//! Serves the web frontend, authenticates against two built-in accounts and
//! exposes device and service-history endpoints over PostgreSQL.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │                MAINTENANCE TRACKER                │
//!   Client        │  ┌─────────┐   ┌─────────────┐   ┌────────────┐  │
//!   ──────────────┼─▶│  http   │──▶│ api / auth  │──▶│   store    │──┼──▶ PostgreSQL
//!                 │  │ server  │   │  handlers   │   │ (Store)    │  │
//!                 │  └────┬────┘   └──────┬──────┘   └────────────┘  │
//!                 │       │ request log   │ auth log                  │
//!                 │       ▼               ▼                           │
//!                 │  ┌───────────────────────────┐   ┌────────────┐  │
//!                 │  │ observability::Logger     │──▶│ console    │  │
//!                 │  │ (+ tracing LoggerLayer)   │──▶│ log file   │  │
//!                 │  └───────────────────────────┘   └────────────┘  │
//!                 │                                                   │
//!                 │  lifecycle::Bootstrapper:                         │
//!                 │    config → database → port → routes → Ready      │
//!                 └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use maintenance_tracker::lifecycle::Bootstrapper;
use maintenance_tracker::observability::{self, LogLevel, Logger};
use maintenance_tracker::store::PgConnector;

#[derive(Parser)]
#[command(name = "maintenance-tracker")]
#[command(about = "Maintenance tracking web backend", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log file used until the configuration says otherwise
    #[arg(long, default_value = "logs/webserver.log")]
    log_file: PathBuf,

    /// Minimum log level (debug, info, warning, error)
    #[arg(long, default_value = "debug")]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logger first so every later step is observable
    let logger = Arc::new(Logger::new());
    logger.init(&cli.log_file, cli.log_level);
    observability::init_tracing(logger.clone());

    logger.info(format_args!(
        "maintenance-tracker v{} starting",
        env!("CARGO_PKG_VERSION")
    ));

    let startup = Bootstrapper::new(cli.config, PgConnector, logger.clone())
        .bootstrap()
        .await;

    startup.run().await?;

    logger.info("Shutdown complete");
    Ok(())
}
