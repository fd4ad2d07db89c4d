use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Result, ToolError};
use crate::model::{SalaryEntry, SalaryLedger};

/// Layout of one payroll line: `name,salary,date`.
#[derive(Debug, Deserialize)]
struct SalaryLine {
    name: String,
    salary: f64,
    date: NaiveDate,
}

const SALARY_FIELDS: usize = 3;

/// Loads the payroll ledger from `path`.
#[instrument(level = "info", skip_all, fields(input = %path.display()))]
pub fn read_salaries(path: &Path) -> Result<SalaryLedger> {
    let ledger = parse_salaries(File::open(path)?)?;
    debug!(employee_count = ledger.len(), "payroll loaded");
    Ok(ledger)
}

/// Parses payroll lines of the form `name,salary,YYYY-MM-DD`.
///
/// Unlike the work-order log, payroll is trusted input: any malformed line
/// fails the whole load with the offending line number.
pub fn parse_salaries<R: Read>(reader: R) -> Result<SalaryLedger> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut ledger = SalaryLedger::default();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |position| position.line());
        if record.len() != SALARY_FIELDS {
            return Err(ToolError::InvalidSalaryRecord {
                line,
                reason: format!("expected {SALARY_FIELDS} fields, found {}", record.len()),
            });
        }

        let parsed: SalaryLine = record.deserialize(None).map_err(|error| {
            ToolError::InvalidSalaryRecord {
                line,
                reason: error.to_string(),
            }
        })?;
        ledger.record(
            parsed.name,
            SalaryEntry {
                date: parsed.date,
                amount: parsed.salary,
            },
        );
    }
    Ok(ledger)
}
