use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::report::{ProfitReport, format_amount};

const RULE_WIDTH: usize = 40;

/// Renders the plain-text version of the report.
pub fn render_text(report: &ProfitReport) -> String {
    let mut text = format!("{}\n{}\n", report.title, "=".repeat(RULE_WIDTH));
    for row in &report.rows {
        text.push_str(&format!(
            "{}, Total Salary: {}, Total Income: {}, Profit: {}\n",
            row.employee,
            format_amount(row.total_salary),
            row.total_income,
            format_amount(row.profit),
        ));
    }
    text
}

/// Writes the plain-text report to `path`.
pub fn write_text_report(path: &Path, report: &ProfitReport) -> Result<()> {
    fs::write(path, render_text(report))?;
    Ok(())
}
