//! Data file discovery and loading.
//!
//! The scanner finds tabular files directly inside the data directory;
//! [`load_table`] parses each of them and concatenates the rows into a
//! single [`RawTable`].

use crate::error::PipelineError;
use crate::models::{RawRecord, RawTable};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Configuration for data file discovery and parsing.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include, compared case-insensitively (e.g., ["csv"])
    pub extensions: Vec<String>,
    /// Field delimiter
    pub delimiter: u8,
    /// Maximum number of files to load
    pub max_files: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["csv".to_string()],
            delimiter: b',',
            max_files: None,
        }
    }
}

impl TryFrom<&crate::config::LoaderConfig> for ScanConfig {
    type Error = anyhow::Error;

    fn try_from(config: &crate::config::LoaderConfig) -> anyhow::Result<Self> {
        Ok(Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            delimiter: config.delimiter_byte()?,
            max_files: config.max_files,
        })
    }
}

/// Scanned file information.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Scanner for discovering data files.
pub struct DataScanner {
    config: ScanConfig,
    data_dir: PathBuf,
}

impl DataScanner {
    /// Create a new data scanner.
    pub fn new(data_dir: PathBuf, config: ScanConfig) -> Self {
        Self { config, data_dir }
    }

    /// Scan for all matching files, ordered by file name.
    pub fn scan(&self) -> Result<Vec<ScannedFile>, PipelineError> {
        let unreadable = |source: io::Error| PipelineError::DataDirUnreadable {
            dir: self.data_dir.clone(),
            source,
        };

        // Surface a missing directory as an I/O error rather than an empty scan
        std::fs::read_dir(&self.data_dir).map_err(unreadable)?;

        let mut files = Vec::new();

        let walker = WalkDir::new(&self.data_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| unreadable(io::Error::from(e)))?;

            if let Some(max) = self.config.max_files {
                if files.len() >= max {
                    break;
                }
            }

            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(ScannedFile {
                path: entry.into_path(),
                size,
            });
        }

        Ok(files)
    }

    /// Check if a file matches scan criteria.
    pub fn matches(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if is_hidden(name) {
                return false;
            }
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        self.config.extensions.iter().any(|e| *e == ext)
    }

    /// Load every matching file into one table.
    ///
    /// Rows keep their order within a file; files are appended in scan order.
    pub fn load(&self) -> Result<RawTable, PipelineError> {
        let files = self.scan()?;

        if files.is_empty() {
            return Err(PipelineError::NoDataFound {
                dir: self.data_dir.clone(),
            });
        }

        let mut table = RawTable::default();

        for file in files {
            let (columns, rows) = read_file(&file.path, self.config.delimiter)?;
            debug!(
                "Loaded {} rows from {} ({} bytes)",
                rows.len(),
                file.path.display(),
                file.size
            );
            table.append(file.path, &columns, rows);
        }

        if table.is_empty() {
            warn!("Data files in {} contain no rows", self.data_dir.display());
        }

        info!(
            "Loaded {} rows from {} file(s) in {}",
            table.len(),
            table.sources.len(),
            self.data_dir.display()
        );

        Ok(table)
    }
}

/// Load all tabular files in `data_dir` into one table.
pub fn load_table(data_dir: &Path, config: &ScanConfig) -> Result<RawTable, PipelineError> {
    DataScanner::new(data_dir.to_path_buf(), config.clone()).load()
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Parse one delimited file into its header and rows.
fn read_file(path: &Path, delimiter: u8) -> Result<(Vec<String>, Vec<RawRecord>), PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| PipelineError::malformed(path, e))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::malformed(path, e))?
        .iter()
        .map(String::from)
        .collect();

    if columns.iter().all(|c| c.is_empty()) {
        return Err(PipelineError::malformed(path, "missing header row"));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| PipelineError::malformed(path, e))?;

        // Short rows leave their trailing columns null; long rows are rejected
        if record.len() > columns.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(PipelineError::malformed(
                path,
                format!(
                    "line {} has {} fields, but the header has {}",
                    line,
                    record.len(),
                    columns.len()
                ),
            ));
        }

        rows.push(RawRecord::from_pairs(
            columns.iter().map(String::as_str).zip(record.iter()),
        ));
    }

    Ok((columns, rows))
}
