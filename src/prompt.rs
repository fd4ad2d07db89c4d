//! Interactive selection of the reporting period on the terminal.

use std::io::{BufRead, Write};

use crate::error::{Result, ToolError};
use crate::model::{DatePredicate, parse_iso_date};

/// Asks whether to report a single month or a date range and reads the
/// matching answers from `input`, echoing prompts to `output`.
pub fn prompt_period<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<DatePredicate> {
    let choice = ask(
        input,
        output,
        "Do you want to specify a single month (1) or a range of dates (2)? Enter 1 or 2: ",
    )?;

    match choice.as_str() {
        "1" => {
            let month = ask(input, output, "Enter the month (1-12): ")?;
            let month: u32 = parse_number(&month, "month")?;
            let year = ask(input, output, "Enter the year (e.g., 2024): ")?;
            let year: i32 = parse_number(&year, "year")?;
            DatePredicate::month(year, month)
        }
        "2" => {
            let start = ask(input, output, "Enter the start date (YYYY-MM-DD): ")?;
            let start = parse_iso_date(&start)?;
            let end = ask(input, output, "Enter the end date (YYYY-MM-DD): ")?;
            let end = parse_iso_date(&end)?;
            Ok(DatePredicate::range(start, end))
        }
        _ => Err(ToolError::InvalidChoice(choice)),
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Err(ToolError::InvalidInput(format!(
            "no answer given to '{}'",
            question.trim_end()
        )));
    }
    Ok(answer.trim().to_string())
}

fn parse_number<T: std::str::FromStr>(answer: &str, what: &str) -> Result<T> {
    answer
        .parse()
        .map_err(|_| ToolError::InvalidInput(format!("'{answer}' is not a valid {what}")))
}
