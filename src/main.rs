//! Sales Report - CSV sales summarizer
//!
//! A CLI tool that loads every CSV file in a data directory, cleans the
//! records and prints revenue, average price, best-selling product and
//! sales by category.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (arguments, configuration, loading, cleaning, analysis)

mod analysis;
mod cleaner;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use error::PipelineError;
use pipeline::Settings;
use std::path::PathBuf;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Load configuration before logging so `[general] verbose` sets the level
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("sales-report v{}", env!("CARGO_PKG_VERSION"));
    log_config_source(&source);
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_report(&args, &config) {
        match e.downcast_ref::<PipelineError>() {
            Some(err) => debug!(code = err.code(), "Pipeline failed: {}", err),
            None => debug!("Report failed: {:#}", e),
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .sales-report.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr so that stdout only carries the report. `RUST_LOG`
/// takes precedence over the verbosity settings when set.
fn init_logging(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete load, clean, analyze and report workflow.
fn run_report(args: &Args, config: &Config) -> Result<()> {
    let settings = Settings::from_config(config)?;

    if args.dry_run {
        return handle_dry_run(&settings);
    }

    let report = pipeline::run(&settings)?;

    let output = match config.report.format {
        OutputFormat::Text => report::generate_text_report(&report),
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Handle --dry-run: list the files that would be loaded, then exit.
fn handle_dry_run(settings: &Settings) -> Result<()> {
    let scanner = loader::DataScanner::new(settings.data_dir.clone(), settings.scan.clone());
    let files = scanner.scan()?;

    if files.is_empty() {
        println!(
            "No matching data files found in {}",
            settings.data_dir.display()
        );
    } else {
        println!("Found {} files that would be loaded:", files.len());
        for file in &files {
            println!("  {} ({} bytes)", file.path.display(), file.size);
        }
    }

    Ok(())
}

/// Where the configuration came from, reported once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    Default,
    Builtin,
    Unreadable(anyhow::Error),
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is initialized, so it reports through
/// [`ConfigSource`] instead of logging directly.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::Default)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Unreadable(e))),
    }
}

fn log_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
        ConfigSource::Default => info!("Loaded default config from {}", CONFIG_FILE_NAME),
        ConfigSource::Builtin => debug!("No config file found, using defaults"),
        ConfigSource::Unreadable(e) => warn!("Failed to load config: {:#}", e),
    }
}
