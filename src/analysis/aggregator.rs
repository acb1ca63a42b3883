//! Sales aggregation and statistics.
//!
//! This module computes the report metrics from a cleaned table. Every
//! function is pure and reads the table in order.

use crate::error::PipelineError;
use crate::models::{AnalysisResult, CategorySales, Period, SaleRecord};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Compute every metric for a non-empty table.
pub fn analyze(records: &[SaleRecord]) -> Result<AnalysisResult, PipelineError> {
    let Some(average_price) = average_price(records) else {
        return Err(PipelineError::EmptyDataset);
    };

    let result = AnalysisResult {
        total_revenue: total_revenue(records),
        average_price,
        best_selling_product: best_selling_product(records),
        sales_by_category: sales_by_category(records),
        order_count: records.len(),
        period: order_period(records),
    };

    debug!(
        "Analyzed {} orders across {} categories",
        result.order_count,
        result.sales_by_category.len()
    );

    Ok(result)
}

/// Sum of all prices.
pub fn total_revenue(records: &[SaleRecord]) -> f64 {
    records.iter().map(|r| r.price).sum()
}

/// Mean price, or `None` for an empty table.
pub fn average_price(records: &[SaleRecord]) -> Option<f64> {
    if records.is_empty() {
        None
    } else {
        Some(total_revenue(records) / records.len() as f64)
    }
}

/// The product that appears in the most rows.
///
/// Among products tied for the highest count, the one seen first wins.
pub fn best_selling_product(records: &[SaleRecord]) -> Option<String> {
    // product -> (count, first index)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (index, product) in records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.product.as_deref().map(|p| (i, p)))
    {
        counts.entry(product).or_insert((0, index)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then_with(|| first_b.cmp(first_a))
        })
        .map(|(product, _)| product.to_string())
}

/// Summed price per category, largest first.
///
/// Equal totals are ordered by category name. Rows without a category are
/// left out.
pub fn sales_by_category(records: &[SaleRecord]) -> Vec<CategorySales> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for record in records {
        if let Some(ref category) = record.category {
            *totals.entry(category.as_str()).or_default() += record.price;
        }
    }

    let mut grouped: Vec<CategorySales> = totals
        .into_iter()
        .map(|(category, total)| CategorySales {
            category: category.to_string(),
            total,
        })
        .collect();

    grouped.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    grouped
}

/// Earliest and latest order dates, if any row carries one.
pub fn order_period(records: &[SaleRecord]) -> Option<Period> {
    let mut dates = records.iter().filter_map(|r| r.date);
    let first = dates.next()?;

    let (first, last) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(Period { first, last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sale(product: &str, price: f64, category: &str, order_id: &str) -> SaleRecord {
        SaleRecord {
            product: Some(product.to_string()),
            price,
            date: None,
            category: Some(category.to_string()),
            order_id: Some(order_id.to_string()),
        }
    }

    #[test]
    fn test_analyze_scenario() {
        let records = vec![
            sale("Widget", 10.0, "tools", "1"),
            sale("Gadget", 5.0, "electronics", "2"),
        ];

        let result = analyze(&records).unwrap();

        assert_eq!(result.total_revenue, 15.0);
        assert_eq!(result.average_price, 7.5);
        assert_eq!(result.best_selling_product.as_deref(), Some("Widget"));
        assert_eq!(
            result.sales_by_category,
            vec![
                CategorySales {
                    category: "tools".to_string(),
                    total: 10.0
                },
                CategorySales {
                    category: "electronics".to_string(),
                    total: 5.0
                },
            ]
        );
        assert_eq!(result.order_count, 2);
        assert_eq!(result.period, None);
    }

    #[test]
    fn test_empty_dataset() {
        assert!(matches!(analyze(&[]), Err(PipelineError::EmptyDataset)));
        assert_eq!(average_price(&[]), None);
    }

    #[test]
    fn test_best_seller_by_frequency() {
        let records = vec![
            sale("Pen", 1.0, "office", "1"),
            sale("Lamp", 40.0, "home", "2"),
            sale("Lamp", 40.0, "home", "3"),
            sale("Pen", 1.0, "office", "4"),
            sale("Pen", 1.0, "office", "5"),
        ];

        assert_eq!(best_selling_product(&records).as_deref(), Some("Pen"));
    }

    #[test]
    fn test_best_seller_tie_goes_to_first_seen() {
        let records = vec![
            sale("Zebra", 1.0, "toys", "1"),
            sale("Apple", 1.0, "food", "2"),
            sale("Apple", 1.0, "food", "3"),
            sale("Zebra", 1.0, "toys", "4"),
        ];

        assert_eq!(best_selling_product(&records).as_deref(), Some("Zebra"));
    }

    #[test]
    fn test_best_seller_ignores_missing_products() {
        let mut unnamed = sale("x", 1.0, "misc", "1");
        unnamed.product = None;
        assert_eq!(best_selling_product(&[unnamed.clone()]), None);

        let records = vec![unnamed.clone(), unnamed, sale("Pen", 1.0, "office", "3")];
        assert_eq!(best_selling_product(&records).as_deref(), Some("Pen"));
    }

    #[test]
    fn test_category_ties_sorted_by_name() {
        let records = vec![
            sale("A", 5.0, "zeta", "1"),
            sale("B", 5.0, "alpha", "2"),
            sale("C", 8.0, "mid", "3"),
        ];

        let names: Vec<_> = sales_by_category(&records)
            .into_iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(names, vec!["mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_category_sums_partition_revenue() {
        let records = vec![
            sale("A", 1.25, "x", "1"),
            sale("B", 2.5, "y", "2"),
            sale("C", 3.75, "x", "3"),
            sale("D", 4.0, "z", "4"),
        ];

        let by_category: f64 = sales_by_category(&records).iter().map(|c| c.total).sum();
        assert!((by_category - total_revenue(&records)).abs() < 1e-9);
    }

    #[test]
    fn test_total_independent_of_order() {
        let mut records = vec![
            sale("A", 0.5, "x", "1"),
            sale("B", 2.0, "y", "2"),
            sale("C", 8.0, "x", "3"),
        ];
        let forward = total_revenue(&records);
        records.reverse();

        assert_eq!(forward, total_revenue(&records));
    }

    #[test]
    fn test_order_period() {
        let day = |d| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let mut records = vec![
            sale("A", 1.0, "x", "1"),
            sale("B", 1.0, "x", "2"),
            sale("C", 1.0, "x", "3"),
        ];
        records[0].date = Some(day(10));
        records[2].date = Some(day(3));

        let period = order_period(&records).unwrap();
        assert_eq!(period.first, day(3));
        assert_eq!(period.last, day(10));
    }
}
