//! Column name normalization.
//!
//! Source files name the same field differently (`item`, `product_name`,
//! `value`, ...). [`ColumnMapping`] resolves, for each canonical column,
//! the ordered list of source columns that feed it.

use crate::models::{RawRecord, RawTable};

/// Canonical columns and the source names accepted for each, highest
/// precedence first. The canonical name always leads its own list.
pub const COLUMN_SYNONYMS: &[(&str, &[&str])] = &[
    ("product", &["product", "product_name", "item"]),
    ("price", &["price", "value"]),
    ("date", &["date", "order_date"]),
    ("category", &["category"]),
    ("order_id", &["order_id"]),
];

/// A row after column normalization, before any type coercion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedRow {
    /// 1-based position in the concatenated raw table.
    pub row: usize,
    pub product: Option<String>,
    pub price: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub order_id: Option<String>,
}

/// Source columns present in a table, per canonical column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMapping {
    pub product: Vec<String>,
    pub price: Vec<String>,
    pub date: Vec<String>,
    pub category: Vec<String>,
    pub order_id: Vec<String>,
}

impl ColumnMapping {
    /// Resolve the mapping for a table's column set.
    ///
    /// Headers are compared after trimming and ASCII lowercasing.
    pub fn resolve(columns: &[String]) -> Self {
        let mut mapping = Self::default();

        for (canonical, synonyms) in COLUMN_SYNONYMS {
            let sources: Vec<String> = synonyms
                .iter()
                .flat_map(|synonym| {
                    columns
                        .iter()
                        .filter(move |c| c.trim().eq_ignore_ascii_case(synonym))
                        .cloned()
                })
                .collect();

            match *canonical {
                "product" => mapping.product = sources,
                "price" => mapping.price = sources,
                "date" => mapping.date = sources,
                "category" => mapping.category = sources,
                _ => mapping.order_id = sources,
            }
        }

        mapping
    }

    /// Map one raw record; the first non-empty source wins.
    pub fn apply(&self, row: usize, record: &RawRecord) -> MappedRow {
        MappedRow {
            row,
            product: first_present(record, &self.product),
            price: first_present(record, &self.price),
            date: first_present(record, &self.date),
            category: first_present(record, &self.category),
            order_id: first_present(record, &self.order_id),
        }
    }
}

fn first_present(record: &RawRecord, sources: &[String]) -> Option<String> {
    sources
        .iter()
        .find_map(|column| record.get(column))
        .map(String::from)
}

/// Normalize every row of a raw table.
pub fn normalize_columns(table: &RawTable) -> (ColumnMapping, Vec<MappedRow>) {
    let mapping = ColumnMapping::resolve(&table.columns);
    let rows = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| mapping.apply(i + 1, record))
        .collect();

    (mapping, rows)
}
