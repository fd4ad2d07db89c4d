use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use chrono::{Days, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, instrument, warn};

use crate::error::{Result, ToolError};
use crate::model::WORK_ORDER_DATE_FORMAT;

/// A work-order row as raw text fields. Arity is checked by the aggregator.
pub type RawRecord = Vec<String>;

/// Loads the work-order log. Workbooks (`.xlsx`, `.xlsm`) are read from their
/// first sheet, anything else is treated as headerless CSV.
#[instrument(level = "info", skip_all, fields(input = %path.display()))]
pub fn read_work_orders(path: &Path) -> Result<Vec<RawRecord>> {
    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm"));

    let records = if is_workbook {
        read_workbook(path)?
    } else {
        parse_csv(File::open(path)?)?
    };
    debug!(record_count = records.len(), "work orders loaded");
    Ok(records)
}

/// Reads headerless CSV rows of any width. Empty rows are dropped and rows
/// that are not valid UTF-8 are skipped.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.byte_records() {
        let record = result?;
        if record.is_empty() {
            continue;
        }
        let line = record.position().map(|position| position.line());
        match StringRecord::from_byte_record(record) {
            Ok(record) => records.push(record.iter().map(str::to_string).collect()),
            Err(error) => warn!(?line, %error, "skipping work order that is not valid UTF-8"),
        }
    }
    Ok(records)
}

fn read_workbook(path: &Path) -> Result<Vec<RawRecord>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ToolError::InvalidWorkbook("workbook has no sheets".into()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{sheet_name}'")))?
        .map_err(ToolError::from)?;

    let records = range
        .rows()
        .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect::<RawRecord>())
        .filter(|fields| fields.iter().any(|field| !field.is_empty()))
        .collect();
    Ok(records)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::DateTime(serial)) => excel_serial_to_date(*serial)
            .map(|date| date.format(WORK_ORDER_DATE_FORMAT).to_string())
            .unwrap_or_else(|| serial.to_string()),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Converts an Excel serial day number (1900 date system) to a calendar date.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.trunc() as u64))
}
