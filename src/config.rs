//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.sales-report.toml` files.

use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".sales-report.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Loader settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Cleaner settings.
    #[serde(default)]
    pub cleaner: CleanerConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding the sales files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            verbose: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Data file discovery and parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// File extensions treated as tabular data.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Field delimiter, a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Maximum number of files to load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_files: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            delimiter: default_delimiter(),
            max_files: None,
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["csv".to_string()]
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl LoaderConfig {
    /// Returns the delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            _ => bail!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ),
        }
    }
}

/// Cleaning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// `chrono` format strings tried, in order, after RFC 3339.
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            date_formats: default_date_formats(),
        }
    }
}

fn default_date_formats() -> Vec<String> {
    vec![
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Symbol printed before every amount.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            format: OutputFormat::default(),
        }
    }
}

fn default_currency() -> String {
    "R$".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values the user actually supplied override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.data_dir {
            self.general.data_dir = dir.clone();
        }

        if let Some(delimiter) = args.delimiter {
            self.loader.delimiter = delimiter.to_string();
        }
        if let Some(ref extensions) = args.extensions {
            self.loader.extensions = extensions.clone();
        }

        if let Some(ref currency) = args.currency {
            self.report.currency = currency.clone();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level for the merged settings. `--quiet` beats `verbose`.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if args.quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
