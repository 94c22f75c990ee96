use clap::Parser;
use pricewatch_core::{AppConfig, MatchMode};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pricewatch")]
#[command(about = "Search online retailers for a product and list prices, cheapest first")]
#[command(version)]
pub struct Cli {
    /// Product to search for, e.g. "smart tv 55"
    #[arg(short, long)]
    pub product: String,

    /// Words that disqualify a listing (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Words a listing must contain (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Accept listings containing any include word instead of all of them
    #[arg(long, visible_alias = "or-include")]
    pub any: bool,

    /// Only search these source IDs, in this order (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Directory holding source definition TOML files
    #[arg(long)]
    pub definitions: Option<PathBuf>,

    /// Also write the full result, with per-source status, as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Give up on unfinished sources after this many seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn match_mode(&self) -> MatchMode {
        if self.any {
            MatchMode::Any
        } else {
            MatchMode::All
        }
    }

    /// Command-line flags win over the config file and environment.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if self.headful {
            config.browser.headless = false;
        }

        if let Some(secs) = self.timeout {
            config.scanning.scan_timeout_secs = secs;
        }

        if let Some(dir) = &self.definitions {
            config.sources.definitions_dir = Some(dir.clone());
        }

        if !self.sources.is_empty() {
            config.sources.enabled.clone_from(&self.sources);
        }
    }
}
