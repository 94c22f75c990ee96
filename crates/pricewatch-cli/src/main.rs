//! `PriceWatch` command line
//!
//! Thin shell over the scanner: parses arguments, sets up logging, and
//! prints the cheapest relevant listings. Business logic lives in the
//! other `crates/`.

mod args;
mod output;
mod scan;

use args::Cli;
use clap::Parser;
use tracing::info;

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pricewatch=debug"));

    // stdout carries the result table
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    info!("Starting PriceWatch v{}", env!("CARGO_PKG_VERSION"));

    scan::run(cli).await
}
