//! Load → clean → analyze orchestration.
//!
//! [`run`] executes the stages in order and stops at the first error. The
//! caller renders the returned [`Report`]; on failure nothing is rendered.

use crate::analysis;
use crate::cleaner::{self, CleanOptions};
use crate::config::Config;
use crate::error::PipelineError;
use crate::loader::{self, ScanConfig};
use crate::models::{Report, ReportMetadata};
use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

/// Everything a pipeline run needs, resolved from configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub scan: ScanConfig,
    pub clean: CleanOptions,
    pub currency: String,
}

impl Settings {
    /// Resolve run settings from a merged configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            data_dir: config.general.data_dir.clone(),
            scan: ScanConfig::try_from(&config.loader)?,
            clean: CleanOptions::from(&config.cleaner),
            currency: config.report.currency.clone(),
        })
    }
}

/// Run the pipeline and build the report.
pub fn run(settings: &Settings) -> Result<Report, PipelineError> {
    info!("1. Loading data from '{}'...", settings.data_dir.display());
    let raw = loader::load_table(&settings.data_dir, &settings.scan)?;

    info!("2. Cleaning and preparing the data...");
    let cleaned = cleaner::clean(&raw, &settings.clean)?;

    info!("3. Running analysis...");
    let analysis = analysis::analyze(&cleaned)?;

    info!("4. Building report...");
    let metadata = ReportMetadata {
        data_dir: settings.data_dir.clone(),
        generated_at: Utc::now(),
        files_loaded: raw.sources.len(),
        rows_loaded: raw.len(),
        rows_cleaned: cleaned.len(),
        currency: settings.currency.clone(),
    };

    Ok(Report { metadata, analysis })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> Settings {
        let mut config = Config::default();
        config.general.data_dir = dir.path().to_path_buf();
        Settings::from_config(&config).unwrap()
    }

    #[test]
    fn test_run_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("january.csv"),
            "order_id,product_name,price,order_date,category\n\
             1,Widget,10.0,2024-01-02,Tools\n\
             1,Widget,10.0,2024-01-02,Tools\n\
             2,Gadget,5.0,2024-01-03,Electronics\n\
             3,Gizmo,,2024-01-04,Electronics\n",
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("february.csv"),
            "order_id,item,value,order_date,category\n\
             4,Widget,12.0,2024-02-01,TOOLS\n",
        )
        .unwrap();

        let report = run(&settings(&temp_dir)).unwrap();
        let analysis = &report.analysis;

        assert_eq!(report.metadata.files_loaded, 2);
        assert_eq!(report.metadata.rows_loaded, 5);
        assert_eq!(report.metadata.rows_cleaned, 3);
        assert_eq!(analysis.total_revenue, 27.0);
        assert_eq!(analysis.average_price, 9.0);
        assert_eq!(analysis.best_selling_product.as_deref(), Some("Widget"));
        assert_eq!(analysis.sales_by_category[0].category, "tools");
        assert_eq!(analysis.sales_by_category[0].total, 22.0);
        assert_eq!(analysis.sales_by_category[1].category, "electronics");

        let period = analysis.period.unwrap();
        assert_eq!(period.first.format("%Y-%m-%d").to_string(), "2024-01-02");
        assert_eq!(period.last.format("%Y-%m-%d").to_string(), "2024-02-01");
    }

    #[test]
    fn test_run_without_files_fails() {
        let temp_dir = TempDir::new().unwrap();

        let err = run(&settings(&temp_dir)).unwrap_err();
        assert!(matches!(err, PipelineError::NoDataFound { .. }));
    }

    #[test]
    fn test_run_with_only_null_prices_is_empty_dataset() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("sales.csv"),
            "order_id,product,price,category\n1,Widget,,tools\n",
        )
        .unwrap();

        let err = run(&settings(&temp_dir)).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset));
    }

    #[test]
    fn test_settings_reject_bad_delimiter() {
        let mut config = Config::default();
        config.loader.delimiter = "ab".to_string();
        assert!(Settings::from_config(&config).is_err());
    }
}
