use tracing::warn;

use crate::model::{DatePredicate, IncomeLedger, SalaryLedger};

/// Column headings of the spreadsheet: employee, total salary, total income,
/// profit.
pub const COLUMN_HEADERS: [&str; 4] = ["موظف", "الراتب الإجمالي", "الدخل الإجمالي", "الأرباح"];

/// Excel refuses sheet names longer than this.
const MAX_SHEET_NAME_LEN: usize = 31;

/// One employee line of the profit report.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitRow {
    pub employee: String,
    pub total_salary: f64,
    pub total_income: i64,
    pub profit: f64,
}

/// Everything needed to render the text and spreadsheet reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitReport {
    /// Title naming the period, e.g. `Report for 2024-03`.
    pub title: String,
    /// Worksheet name derived from the period.
    pub sheet_name: String,
    /// One row per payroll employee, in ledger order.
    pub rows: Vec<ProfitRow>,
    /// Mechanics who earned income but have no payroll entry.
    pub unmatched_mechanics: Vec<String>,
}

/// Combines payroll and income for the period into report rows.
///
/// Only employees present in the payroll ledger get a row; income credited to
/// anyone else is listed in [`ProfitReport::unmatched_mechanics`].
pub fn build_report(
    salaries: &SalaryLedger,
    income: &IncomeLedger,
    predicate: &DatePredicate,
) -> ProfitReport {
    let rows = salaries
        .employees()
        .iter()
        .map(|employee| {
            let total_salary = employee.total_for(predicate);
            let total_income = income.income_for(&employee.name);
            ProfitRow {
                employee: employee.name.clone(),
                total_salary,
                total_income,
                profit: total_income as f64 - total_salary,
            }
        })
        .collect();

    let unmatched_mechanics: Vec<String> = income
        .iter()
        .filter(|(mechanic, _)| salaries.get(mechanic).is_none())
        .map(|(mechanic, _)| mechanic.to_string())
        .collect();
    for mechanic in &unmatched_mechanics {
        warn!(
            mechanic = %mechanic,
            income = income.income_for(mechanic),
            "income credited to a mechanic without payroll records is not reported"
        );
    }

    let label = predicate.label();
    ProfitReport {
        title: format!("Report for {label}"),
        sheet_name: sanitize_sheet_name(&format!("Report {label}")),
        rows,
        unmatched_mechanics,
    }
}

/// Formats a money amount: whole values without decimals, others with two.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "Report".to_string();
    }

    sanitized.chars().take(MAX_SHEET_NAME_LEN).collect()
}
