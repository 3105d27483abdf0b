//! Command-line interface.

use clap::Parser;
use std::path::PathBuf;

/// A terminal stock lookup client.
///
/// Type a ticker symbol, press Enter, and browse the company outlook and
/// stock summary returned by the backend's `/api/stock/{symbol}` endpoint.
#[derive(Parser, Debug, Clone)]
#[command(name = "stocklens")]
#[command(version)]
#[command(about = "A terminal stock lookup client", long_about = None)]
pub struct Args {
    /// Symbol to pre-fill in the search input
    ///
    /// In batch mode this is the symbol that gets searched.
    #[arg(short = 's', long, env = "STOCKLENS_SYMBOL")]
    pub symbol: Option<String>,

    /// Base URL of the stock lookup backend (overrides the config file)
    #[arg(short = 'u', long, env = "STOCKLENS_BASE_URL")]
    pub base_url: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "STOCKLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// API timeout in seconds (overrides the config file)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Batch mode - search once, print the result tables and exit
    #[arg(short = 'b', long)]
    pub batch: bool,

    /// Table width used to fit the description in batch mode
    #[arg(short = 'w', long, default_value = "100")]
    pub width: u16,

    /// Write log output to this file
    #[arg(long, env = "STOCKLENS_LOG")]
    pub log_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
