use std::path::Path;

use rust_xlsxwriter::{Format, FormatAlign, Workbook};

use crate::error::Result;
use crate::report::{COLUMN_HEADERS, ProfitReport};

const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 1;
const FIRST_DATA_ROW: u32 = 2;

/// Writes the report as a single-sheet workbook: a centred title merged across
/// the four columns, the header row, then one row per employee.
pub fn write_workbook(path: &Path, report: &ProfitReport) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&report.sheet_name)?;

    let last_col = (COLUMN_HEADERS.len() as u16).saturating_sub(1);
    let title_format = Format::new().set_align(FormatAlign::Center);
    worksheet.merge_range(TITLE_ROW, 0, TITLE_ROW, last_col, &report.title, &title_format)?;

    for (col_idx, header) in COLUMN_HEADERS.iter().enumerate() {
        worksheet.write_string(HEADER_ROW, col_idx as u16, *header)?;
    }

    for (row_idx, row) in report.rows.iter().enumerate() {
        let excel_row = FIRST_DATA_ROW + row_idx as u32;
        worksheet.write_string(excel_row, 0, &row.employee)?;
        worksheet.write_number(excel_row, 1, row.total_salary)?;
        worksheet.write_number(excel_row, 2, row.total_income as f64)?;
        worksheet.write_number(excel_row, 3, row.profit)?;
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}
