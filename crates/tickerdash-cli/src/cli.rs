//! CLI argument definitions for tickerdash.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `chart` | Build the multi-series chart model for a selection |
//! | `quote` | Fetch quote cards through the relay |
//! | `search` | Search symbols through the relay |
//! | `window` | Show the resolved time window for a range |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--relay-url` | `http://127.0.0.1:8787/api/finnhub` | Relay base URL (`TICKERDASH_RELAY_URL`) |
//! | `--timeout-ms` | `5000` | Request and settle budget in ms |
//!
//! # Examples
//!
//! ```bash
//! tickerdash chart AAPL MSFT --range 6M --seed 7 --pretty
//! tickerdash chart TSLA --live --range 5D
//! tickerdash quote AAPL NVDA
//! tickerdash search "bank of" --limit 5
//! tickerdash window --range MAX
//! ```

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickerdash_core::config::{DEFAULT_RELAY_URL, DEFAULT_TIMEOUT_MS};
use tickerdash_core::{DashboardConfig, DataMode, Symbol, TimeRange};

use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "tickerdash",
    author,
    version,
    about = "Headless stock dashboard: charts, quotes and symbol search"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Base URL of the key-holding relay.
    #[arg(long, global = true, env = "TICKERDASH_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
    pub relay_url: String,

    /// Request timeout, also the budget for a chart to settle.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            relay_url: self.relay_url.clone(),
            timeout_ms: self.timeout_ms,
            ..DashboardConfig::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object.
    Json,
    /// Indented plain-text summary.
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the chart model for the given tickers and range.
    ///
    /// Without tickers the default selection (AAPL) is charted.
    ///
    ///   tickerdash chart AAPL MSFT --range 1Y
    ///   tickerdash chart --live --range 5D NVDA
    Chart(ChartArgs),

    /// Fetch quote cards for one or more tickers.
    Quote(QuoteArgs),

    /// Search stocks and ETFs by symbol or name.
    Search(SearchArgs),

    /// Show the start, end and resolution a range resolves to now.
    Window(WindowArgs),
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Tickers in display order.
    pub symbols: Vec<String>,

    /// Time range: 1D, 5D, 1M, 6M, 1Y, 5Y or MAX.
    #[arg(long, default_value = "1Y")]
    pub range: String,

    /// Data mode: simulated or live.
    #[arg(long, env = "TICKERDASH_DATA_MODE", default_value = "simulated")]
    pub mode: String,

    /// Shorthand for `--mode live`.
    #[arg(long, default_value_t = false)]
    pub live: bool,

    /// Seed for reproducible synthetic series.
    #[arg(long, env = "TICKERDASH_SEED")]
    pub seed: Option<u64>,
}

impl ChartArgs {
    pub fn data_mode(&self) -> Result<DataMode, CliError> {
        if self.live {
            return Ok(DataMode::Live);
        }
        Ok(self.mode.parse()?)
    }

    pub fn time_range(&self) -> Result<TimeRange, CliError> {
        Ok(self.range.parse()?)
    }
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// One or more tickers.
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-form query (symbol or company name).
    pub query: String,

    /// Maximum number of results (at most 10).
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Time range: 1D, 5D, 1M, 6M, 1Y, 5Y or MAX.
    #[arg(long, default_value = "1Y")]
    pub range: String,
}

pub fn parse_symbols(raw: &[String]) -> Result<Vec<Symbol>, CliError> {
    Ok(raw
        .iter()
        .map(|value| Symbol::parse(value))
        .collect::<Result<Vec<_>, _>>()?)
}
