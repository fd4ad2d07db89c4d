use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::aggregate::aggregate;
use crate::error::{Result, ToolError};
use crate::io::excel_write;
use crate::io::salaries::read_salaries;
use crate::io::text_report;
use crate::io::work_orders::read_work_orders;
use crate::model::DatePredicate;
use crate::report::{ProfitReport, build_report};

/// Where the input ledgers live and where reports are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSources {
    pub salaries: PathBuf,
    pub work_orders: PathBuf,
    pub output_dir: PathBuf,
}

/// Paths of the reports produced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub text: PathBuf,
    pub workbook: PathBuf,
}

impl ReportFiles {
    /// Output paths for `predicate` inside `output_dir`.
    pub fn for_period(output_dir: &Path, predicate: &DatePredicate) -> Self {
        let stem = predicate.file_stem();
        Self {
            text: output_dir.join(format!("{stem}.txt")),
            workbook: output_dir.join(format!("{stem}.xlsx")),
        }
    }
}

/// Loads both ledgers and computes the profit report for the period.
#[instrument(
    level = "info",
    skip_all,
    fields(
        salaries = %sources.salaries.display(),
        work_orders = %sources.work_orders.display(),
        period = %predicate.label()
    )
)]
pub fn compute_report(sources: &ReportSources, predicate: &DatePredicate) -> Result<ProfitReport> {
    for input in [&sources.salaries, &sources.work_orders] {
        if !input.exists() {
            return Err(ToolError::MissingInput(input.clone()));
        }
    }

    let salaries = read_salaries(&sources.salaries)?;
    let work_orders = read_work_orders(&sources.work_orders)?;
    info!(
        employee_count = salaries.len(),
        work_order_count = work_orders.len(),
        "ledgers loaded"
    );

    let income = aggregate(&work_orders, predicate);
    Ok(build_report(&salaries, &income, predicate))
}

/// Creates the output directory when it does not exist yet.
pub fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    Ok(())
}

/// Computes the report for the period and writes its text and workbook forms
/// into the output directory. The directory is created first, so it exists
/// even when loading the ledgers fails.
#[instrument(
    level = "info",
    skip_all,
    fields(output_dir = %sources.output_dir.display(), period = %predicate.label())
)]
pub fn generate_reports(sources: &ReportSources, predicate: &DatePredicate) -> Result<ReportFiles> {
    prepare_output_dir(&sources.output_dir)?;
    let report = compute_report(sources, predicate)?;

    let files = ReportFiles::for_period(&sources.output_dir, predicate);
    text_report::write_text_report(&files.text, &report)?;
    excel_write::write_workbook(&files.workbook, &report)?;

    info!(
        row_count = report.rows.len(),
        text = %files.text.display(),
        workbook = %files.workbook.display(),
        "reports written"
    );
    Ok(files)
}
