//! Raw table cleaning.
//!
//! Cleaning runs a fixed sequence of steps over the loaded rows:
//!
//! 1. column normalization ([`columns`])
//! 2. dropping rows without a price
//! 3. price and date coercion ([`coercion`])
//! 4. lowercasing categories
//! 5. deduplication on `order_id`, keeping the first occurrence
//!
//! Any coercion failure aborts cleaning; nothing is repaired or skipped.

pub mod coercion;
pub mod columns;

use crate::error::PipelineError;
use crate::models::{CleanTable, RawTable, SaleRecord};
use std::collections::HashSet;
use tracing::{debug, info};

pub use columns::{normalize_columns, MappedRow};

/// Options for the cleaning stage.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// `chrono` formats accepted for the date column, after RFC 3339.
    pub date_formats: Vec<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self::from(&crate::config::CleanerConfig::default())
    }
}

impl From<&crate::config::CleanerConfig> for CleanOptions {
    fn from(config: &crate::config::CleanerConfig) -> Self {
        Self {
            date_formats: config.date_formats.clone(),
        }
    }
}

/// Clean a raw table into sale records.
pub fn clean(raw: &RawTable, options: &CleanOptions) -> Result<CleanTable, PipelineError> {
    let (mapping, rows) = normalize_columns(raw);
    debug!("Column mapping: {:?}", mapping);

    if mapping.price.is_empty() {
        return Err(PipelineError::MissingColumn("price".to_string()));
    }

    let rows = drop_missing_prices(rows);
    let records = coerce_types(rows, options)?;
    let records = lowercase_categories(records);
    let records = deduplicate(records);

    info!(
        "Cleaned {} raw rows down to {} sale records",
        raw.len(),
        records.len()
    );

    Ok(records)
}

/// Drop rows whose price cell is empty or missing.
pub fn drop_missing_prices(rows: Vec<MappedRow>) -> Vec<MappedRow> {
    let before = rows.len();
    let kept: Vec<MappedRow> = rows.into_iter().filter(|r| r.price.is_some()).collect();

    if kept.len() < before {
        debug!("Dropped {} rows without a price", before - kept.len());
    }

    kept
}

/// Convert price and date text into typed values.
pub fn coerce_types(
    rows: Vec<MappedRow>,
    options: &CleanOptions,
) -> Result<Vec<SaleRecord>, PipelineError> {
    rows.into_iter()
        .map(|row| {
            let raw_price = row.price.unwrap_or_default();
            let price = coercion::parse_price(&raw_price).ok_or_else(|| {
                PipelineError::InvalidPriceFormat {
                    row: row.row,
                    value: raw_price.clone(),
                }
            })?;

            let date = match row.date {
                Some(value) => Some(
                    coercion::parse_date(&value, &options.date_formats).ok_or(
                        PipelineError::InvalidDateFormat {
                            row: row.row,
                            value,
                        },
                    )?,
                ),
                None => None,
            };

            Ok(SaleRecord {
                product: row.product,
                price,
                date,
                category: row.category,
                order_id: row.order_id,
            })
        })
        .collect()
}

/// Lowercase every category.
pub fn lowercase_categories(records: Vec<SaleRecord>) -> Vec<SaleRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.category = record.category.map(|c| c.to_lowercase());
            record
        })
        .collect()
}

/// Keep the first record for each `order_id`.
///
/// Records without an id share one key, so at most one of them survives.
pub fn deduplicate(records: Vec<SaleRecord>) -> Vec<SaleRecord> {
    let before = records.len();
    let mut seen: HashSet<Option<String>> = HashSet::new();

    let kept: Vec<SaleRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.order_id.clone()))
        .collect();

    if kept.len() < before {
        debug!("Removed {} duplicate orders", before - kept.len());
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use std::path::PathBuf;

    fn raw_table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let records = rows
            .iter()
            .map(|values| {
                RawRecord::from_pairs(
                    columns
                        .iter()
                        .map(String::as_str)
                        .zip(values.iter().copied()),
                )
            })
            .collect();

        let mut table = RawTable::default();
        table.append(PathBuf::from("sales.csv"), &columns, records);
        table
    }

    #[test]
    fn test_duplicate_order_scenario() {
        let raw = raw_table(
            &["product", "price", "category", "order_id"],
            &[
                &["Widget", "10.0", "Tools", "1"],
                &["Widget", "10.0", "Tools", "1"],
                &["Gadget", "5.0", "Electronics", "2"],
            ],
        );

        let cleaned = clean(&raw, &CleanOptions::default()).unwrap();

        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].product.as_deref(), Some("Widget"));
        assert_eq!(cleaned[0].category.as_deref(), Some("tools"));
        assert_eq!(cleaned[1].category.as_deref(), Some("electronics"));
    }

    #[test]
    fn test_null_price_rows_are_dropped() {
        let raw = raw_table(
            &["item", "value", "category", "order_id"],
            &[
                &["Pen", "2.0", "office", "1"],
                &["Lamp", "", "home", "2"],
                &["Ink", "3.5", "office", "3"],
            ],
        );

        let cleaned = clean(&raw, &CleanOptions::default()).unwrap();

        assert_eq!(cleaned.len(), 2);
        assert!(cleaned.iter().all(|r| r.product.as_deref() != Some("Lamp")));
    }

    #[test]
    fn test_null_token_prices_are_dropped() {
        let raw = raw_table(
            &["order_id", "product", "price", "category"],
            &[
                &["1", "Widget", "10.0", "tools"],
                &["2", "Gadget", "NA", "tools"],
                &["3", "Lamp", "NaN", "home"],
            ],
        );

        let cleaned = clean(&raw, &CleanOptions::default()).unwrap();

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].product.as_deref(), Some("Widget"));
        assert_eq!(cleaned[0].price, 10.0);
    }

    #[test]
    fn test_invalid_price_aborts() {
        let raw = raw_table(
            &["product", "price", "order_id"],
            &[&["Pen", "2.0", "1"], &["Lamp", "cheap", "2"]],
        );

        let err = clean(&raw, &CleanOptions::default()).unwrap_err();
        match err {
            PipelineError::InvalidPriceFormat { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "cheap");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_date_aborts() {
        let raw = raw_table(
            &["product", "price", "order_date"],
            &[&["Pen", "2.0", "2024-01-05"], &["Lamp", "4.0", "someday"]],
        );

        let err = clean(&raw, &CleanOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDateFormat { row: 2, .. }));
    }

    #[test]
    fn test_invalid_date_on_dropped_row_is_ignored() {
        let raw = raw_table(
            &["product", "price", "date"],
            &[&["Pen", "2.0", "2024-01-05"], &["Lamp", "", "someday"]],
        );

        let cleaned = clean(&raw, &CleanOptions::default()).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert!(cleaned[0].date.is_some());
    }

    #[test]
    fn test_missing_price_column() {
        let raw = raw_table(&["product", "category"], &[&["Pen", "office"]]);

        let err = clean(&raw, &CleanOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn(ref c) if c == "price"));
    }

    #[test]
    fn test_mixed_headers_across_files() {
        let mut raw = raw_table(
            &["product_name", "price", "order_id"],
            &[&["Pen", "1.0", "1"]],
        );
        let second = raw_table(&["item", "value", "order_id"], &[&["Ink", "2.0", "2"]]);
        raw.append(PathBuf::from("b.csv"), &second.columns, second.rows);

        let cleaned = clean(&raw, &CleanOptions::default()).unwrap();

        let products: Vec<_> = cleaned.iter().map(|r| r.product.as_deref()).collect();
        assert_eq!(products, vec![Some("Pen"), Some("Ink")]);
        assert_eq!(cleaned[1].price, 2.0);
    }

    #[test]
    fn test_deduplicate_is_idempotent() {
        let raw = raw_table(
            &["product", "price", "order_id"],
            &[
                &["Pen", "1.0", "1"],
                &["Ink", "2.0", "2"],
                &["Pen", "9.0", "1"],
                &["Cap", "3.0", ""],
                &["Nib", "4.0", ""],
            ],
        );

        let once = clean(&raw, &CleanOptions::default()).unwrap();
        let twice = deduplicate(once.clone());

        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
        assert_eq!(once[0].price, 1.0);
        assert_eq!(once[2].product.as_deref(), Some("Cap"));
    }

    #[test]
    fn test_dedup_runs_after_null_filter() {
        let raw = raw_table(
            &["product", "price", "order_id"],
            &[&["Pen", "", "1"], &["Pen", "5.0", "1"]],
        );

        let cleaned = clean(&raw, &CleanOptions::default()).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].price, 5.0);
    }
}
