//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sales Report - summarize a directory of CSV sales records
///
/// Loads every CSV file in the data directory, normalizes column names,
/// drops invalid and duplicate orders, and prints revenue, average price,
/// best-selling product and sales by category.
///
/// Examples:
///   sales-report
///   sales-report --data-dir ./exports --currency '$'
///   sales-report --format json --output report.json
///   sales-report --dry-run
///   sales-report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing the sales files
    ///
    /// Defaults to `data`, or the value from .sales-report.toml.
    #[arg(short, long, value_name = "DIR", env = "SALES_REPORT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .sales-report.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the report to a file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Currency symbol printed before amounts
    #[arg(long, value_name = "SYMBOL")]
    pub currency: Option<String>,

    /// Field delimiter used in the data files
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// File extensions to load (comma-separated)
    ///
    /// Example: --extensions csv,txt
    #[arg(long, value_name = "EXTS", value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// List the files that would be loaded and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .sales-report.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() || delimiter == '\n' || delimiter == '\r' {
                return Err(format!("Invalid delimiter: {:?}", delimiter));
            }
        }

        if let Some(ref extensions) = self.extensions {
            if extensions.iter().all(|e| e.trim().is_empty()) {
                return Err("At least one file extension is required".to_string());
            }
        }

        if let Some(ref currency) = self.currency {
            if currency.contains('\n') {
                return Err("Currency symbol must fit on one line".to_string());
            }
        }

        Ok(())
    }
}
