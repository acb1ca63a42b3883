//! Data models for the sales pipeline.
//!
//! Rows exist in two shapes: [`RawRecord`] as read from disk, keyed by
//! whatever header the source file used, and [`SaleRecord`] once the
//! cleaner has mapped, filtered and coerced it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Cell values read as null, matched exactly (case-sensitive).
pub const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns true for an empty cell or one of the [`NULL_TOKENS`].
pub fn is_null_token(value: &str) -> bool {
    value.is_empty() || NULL_TOKENS.contains(&value)
}

/// One data row as read from a file. Null cells are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// Builds a record from `(column, value)` pairs, dropping null values.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut fields = HashMap::new();
        for (column, value) in pairs {
            let value = value.into();
            if !is_null_token(&value) {
                fields.insert(column.into(), value);
            }
        }
        Self { fields }
    }

    /// Returns the value stored under `column`, if the cell was not null.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// All rows from every loaded file, concatenated.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Union of the column names seen, in first-seen order.
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
    /// Files the rows came from, in load order.
    pub sources: Vec<PathBuf>,
}

impl RawTable {
    /// Appends the rows of one file, registering any new column names.
    pub fn append(&mut self, source: PathBuf, columns: &[String], rows: Vec<RawRecord>) {
        for column in columns {
            if !self.columns.contains(column) {
                self.columns.push(column.clone());
            }
        }
        self.rows.extend(rows);
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A cleaned sales row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub product: Option<String>,
    /// Always present and finite after cleaning.
    pub price: f64,
    pub date: Option<NaiveDateTime>,
    /// Lowercase.
    pub category: Option<String>,
    pub order_id: Option<String>,
}

/// Rows that passed every cleaning step.
pub type CleanTable = Vec<SaleRecord>;

/// Summed sales for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: String,
    pub total: f64,
}

/// First and last order timestamps seen in the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
}

/// Aggregate metrics computed over a clean table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Sum of all prices.
    pub total_revenue: f64,
    /// Mean of all prices.
    pub average_price: f64,
    /// Most frequent product; earliest in table order wins a tie.
    pub best_selling_product: Option<String>,
    /// Sorted by descending total, then ascending category name.
    pub sales_by_category: Vec<CategorySales>,
    /// Number of rows the metrics were computed over.
    pub order_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

/// Run information shown alongside the metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Directory the data was loaded from.
    pub data_dir: PathBuf,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Number of files loaded.
    pub files_loaded: usize,
    /// Rows read before cleaning.
    pub rows_loaded: usize,
    /// Rows left after cleaning.
    pub rows_cleaned: usize,
    /// Currency symbol used when rendering amounts.
    pub currency: String,
}

/// The complete sales report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub analysis: AnalysisResult,
}
