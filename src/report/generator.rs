//! Report rendering.
//!
//! Turns a [`Report`] into plain text, Markdown or JSON. Nothing here
//! computes metrics; values are printed in the order the analyzer produced.

use crate::models::{AnalysisResult, CategorySales, Report, ReportMetadata};
use anyhow::Result;

const NO_PRODUCT: &str = "n/a";

/// Generate the plain text report.
pub fn generate_text_report(report: &Report) -> String {
    let analysis = &report.analysis;
    let currency = report.metadata.currency.as_str();
    let mut output = String::new();

    output.push_str("--- Sales Analysis Report ---\n\n");
    output.push_str(&format!(
        "Total Revenue: {}\n",
        format_currency(analysis.total_revenue, currency)
    ));
    output.push_str(&format!(
        "Average Product Price: {}\n",
        format_currency(analysis.average_price, currency)
    ));
    output.push_str(&format!(
        "Best-Selling Product: {}\n",
        best_seller(analysis)
    ));

    output.push_str("\n--- Sales by Category ---\n");
    output.push_str(&category_lines(&analysis.sales_by_category, currency));

    output.push_str("\n--- End of Report ---\n");

    output
}

/// Category breakdown with names left-aligned and amounts right-aligned.
fn category_lines(categories: &[CategorySales], currency: &str) -> String {
    if categories.is_empty() {
        return "(no categorized sales)\n".to_string();
    }

    let amounts: Vec<String> = categories
        .iter()
        .map(|c| format_currency(c.total, currency))
        .collect();
    let name_width = categories
        .iter()
        .map(|c| c.category.chars().count())
        .max()
        .unwrap_or(0);
    let amount_width = amounts.iter().map(|a| a.chars().count()).max().unwrap_or(0);

    let mut lines = String::new();
    for (category, amount) in categories.iter().zip(&amounts) {
        lines.push_str(&format!(
            "{:<name_width$}  {:>amount_width$}\n",
            category.category, amount
        ));
    }

    lines
}

/// Generate a Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Sales Analysis Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata, &report.analysis));
    output.push_str(&generate_summary_section(
        &report.analysis,
        &report.metadata.currency,
    ));
    output.push_str(&generate_category_section(
        &report.analysis.sales_by_category,
        &report.metadata.currency,
    ));
    output.push_str("---\n\n*Report generated by sales-report*\n");

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, analysis: &AnalysisResult) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Data Directory:** `{}`\n",
        metadata.data_dir.display()
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Files Loaded:** {}\n", metadata.files_loaded));
    section.push_str(&format!("- **Rows Loaded:** {}\n", metadata.rows_loaded));
    section.push_str(&format!(
        "- **Rows After Cleaning:** {}\n",
        metadata.rows_cleaned
    ));
    if let Some(period) = analysis.period {
        section.push_str(&format!(
            "- **Period:** {} to {}\n",
            period.first.format("%Y-%m-%d"),
            period.last.format("%Y-%m-%d")
        ));
    }
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(analysis: &AnalysisResult, currency: &str) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Metric | Value |\n");
    section.push_str("|:---|---:|\n");
    section.push_str(&format!(
        "| Total Revenue | {} |\n",
        format_currency(analysis.total_revenue, currency)
    ));
    section.push_str(&format!(
        "| Average Product Price | {} |\n",
        format_currency(analysis.average_price, currency)
    ));
    section.push_str(&format!(
        "| Best-Selling Product | {} |\n",
        best_seller(analysis)
    ));
    section.push_str(&format!("| Orders | {} |\n\n", analysis.order_count));

    section
}

/// Generate the sales by category section.
fn generate_category_section(categories: &[CategorySales], currency: &str) -> String {
    let mut section = String::new();

    section.push_str("## Sales by Category\n\n");

    if categories.is_empty() {
        section.push_str("No categorized sales.\n\n");
        return section;
    }

    section.push_str("| Category | Sales |\n");
    section.push_str("|:---|---:|\n");
    for category in categories {
        section.push_str(&format!(
            "| {} | {} |\n",
            category.category,
            format_currency(category.total, currency)
        ));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

fn best_seller(analysis: &AnalysisResult) -> &str {
    analysis
        .best_selling_product
        .as_deref()
        .unwrap_or(NO_PRODUCT)
}

/// Format an amount with two decimals and `,` thousands separators.
///
/// `format_currency(1234.5, "R$")` gives `"R$ 1,234.50"`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let digits = format!("{:.2}", amount.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0.001 rounds to 0.00 and should not print a sign
    let sign = if amount < 0.0 && digits != "0.00" { "-" } else { "" };

    if symbol.is_empty() {
        format!("{sign}{grouped}.{fraction}")
    } else {
        format!("{symbol} {sign}{grouped}.{fraction}")
    }
}
