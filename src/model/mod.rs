use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, ToolError};

/// Number of columns every work-order row must carry.
pub const WORK_ORDER_FIELDS: usize = 10;

/// Date layout used by the work-order log (`15.03.2024`).
pub const WORK_ORDER_DATE_FORMAT: &str = "%d.%m.%Y";

/// Date layout used by the payroll ledger and the command line (`2024-03-15`).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A borrowed view over one row of the work-order log.
///
/// Fields are kept as the raw text found in the source; interpretation of the
/// entry date and the narrative happens in the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkOrder<'a> {
    pub vehicle_plate: &'a str,
    pub vehicle_type: &'a str,
    pub entry_date: &'a str,
    pub company: &'a str,
    pub driver: &'a str,
    pub phone: &'a str,
    pub mechanic: &'a str,
    pub note1: &'a str,
    pub note2: &'a str,
    /// Free-text final report carrying the charged amount.
    pub final_report: &'a str,
}

impl<'a> WorkOrder<'a> {
    /// Maps a raw row onto the named columns. Returns `None` unless the row has
    /// exactly [`WORK_ORDER_FIELDS`] fields.
    pub fn from_fields(fields: &'a [String]) -> Option<Self> {
        match fields {
            [
                vehicle_plate,
                vehicle_type,
                entry_date,
                company,
                driver,
                phone,
                mechanic,
                note1,
                note2,
                final_report,
            ] => Some(Self {
                vehicle_plate,
                vehicle_type,
                entry_date,
                company,
                driver,
                phone,
                mechanic,
                note1,
                note2,
                final_report,
            }),
            _ => None,
        }
    }
}

/// Window a report covers. Both income and salaries are filtered with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePredicate {
    /// Every day of calendar month `month` in `year`.
    Month { year: i32, month: u32 },
    /// Every day from `start` to `end`, both inclusive.
    Range { start: NaiveDate, end: NaiveDate },
}

impl DatePredicate {
    /// Builds a month predicate, rejecting months outside 1-12.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ToolError::InvalidMonth(month));
        }
        Ok(Self::Month { year, month })
    }

    /// Builds an inclusive range predicate. A range whose start lies after its
    /// end is accepted and simply matches nothing.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Range { start, end }
    }

    /// Returns true when `date` falls inside the window.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match *self {
            DatePredicate::Month { year, month } => date.year() == year && date.month() == month,
            DatePredicate::Range { start, end } => start <= date && date <= end,
        }
    }

    /// Human readable period, e.g. `2024-03` or `2024-01-01 to 2024-01-31`.
    pub fn label(&self) -> String {
        match self {
            DatePredicate::Month { year, month } => format!("{year}-{month:02}"),
            DatePredicate::Range { start, end } => format!(
                "{} to {}",
                start.format(ISO_DATE_FORMAT),
                end.format(ISO_DATE_FORMAT)
            ),
        }
    }

    /// File name stem for the generated reports.
    pub fn file_stem(&self) -> String {
        match self {
            DatePredicate::Month { year, month } => format!("report_{year}_{month:02}"),
            DatePredicate::Range { start, end } => format!(
                "report_{}_{}",
                start.format("%Y%m%d"),
                end.format("%Y%m%d")
            ),
        }
    }
}

/// Parses a work-order entry date such as `15.03.2024` or `5.3.2024`.
///
/// The layout is checked before chrono sees the text, since chrono skips
/// whitespace before numbers and takes years of any width. Day and month are
/// one or two ASCII digits (the day may instead be a space and one digit), the
/// year is exactly four digits and at least 1, and nothing else may surround
/// them.
pub fn parse_entry_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.split('.');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let day_digits = match day.strip_prefix(' ') {
        Some(single) if single.len() == 1 => single,
        Some(_) => return None,
        None => day,
    };
    let layout_ok = is_ascii_number(day_digits, 1, 2)
        && is_ascii_number(month, 1, 2)
        && is_ascii_number(year, 4, 4)
        && year != "0000";
    if !layout_ok {
        return None;
    }

    NaiveDate::parse_from_str(value, WORK_ORDER_DATE_FORMAT).ok()
}

fn is_ascii_number(text: &str, min_width: usize, max_width: usize) -> bool {
    (min_width..=max_width).contains(&text.len()) && text.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a `YYYY-MM-DD` date as entered on the command line or at a prompt.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).map_err(|_| ToolError::InvalidDate {
        value: value.trim().to_string(),
        expected: "YYYY-MM-DD",
    })
}

/// One salary payment taken from the payroll ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryEntry {
    pub date: NaiveDate,
    pub amount: f64,
}

/// All salary payments made to one employee, in ledger order.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeSalaries {
    pub name: String,
    pub entries: Vec<SalaryEntry>,
}

impl EmployeeSalaries {
    /// Sums the payments whose date satisfies `predicate`.
    pub fn total_for(&self, predicate: &DatePredicate) -> f64 {
        self.entries
            .iter()
            .filter(|entry| predicate.matches(entry.date))
            .map(|entry| entry.amount)
            .sum()
    }
}

/// Payroll grouped by employee, keeping the order in which employees first
/// appear in the ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryLedger {
    employees: Vec<EmployeeSalaries>,
}

impl SalaryLedger {
    /// Appends a payment to the employee's history, registering the employee
    /// on first sight.
    pub fn record(&mut self, name: impl Into<String>, entry: SalaryEntry) {
        let name = name.into();
        match self.employees.iter_mut().find(|employee| employee.name == name) {
            Some(employee) => employee.entries.push(entry),
            None => self.employees.push(EmployeeSalaries {
                name,
                entries: vec![entry],
            }),
        }
    }

    pub fn employees(&self) -> &[EmployeeSalaries] {
        &self.employees
    }

    pub fn get(&self, name: &str) -> Option<&EmployeeSalaries> {
        self.employees.iter().find(|employee| employee.name == name)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

/// Cumulative income per mechanic.
///
/// Iteration follows insertion order (first credited mechanic first). Equality
/// ignores that order: two ledgers are equal when they hold the same totals.
#[derive(Debug, Clone, Default)]
pub struct IncomeLedger {
    totals: Vec<(String, i64)>,
    index: HashMap<String, usize>,
}

impl IncomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the mechanic's total, creating the entry at zero, and
    /// returns the new total. Returns `None` and leaves the ledger untouched
    /// when the total would overflow.
    #[must_use]
    pub fn checked_credit(&mut self, mechanic: &str, amount: i64) -> Option<i64> {
        match self.index.get(mechanic) {
            Some(&position) => {
                let total = self.totals[position].1.checked_add(amount)?;
                self.totals[position].1 = total;
                Some(total)
            }
            None => {
                self.index.insert(mechanic.to_string(), self.totals.len());
                self.totals.push((mechanic.to_string(), amount));
                Some(amount)
            }
        }
    }

    /// Adds `amount` to the mechanic's total, saturating at `i64::MAX`/`i64::MIN`.
    pub fn credit(&mut self, mechanic: &str, amount: i64) {
        if self.checked_credit(mechanic, amount).is_none() {
            let position = self.index[mechanic];
            let total = &mut self.totals[position].1;
            *total = total.saturating_add(amount);
        }
    }

    /// Folds another ledger into this one by summing per mechanic. Totals
    /// saturate instead of overflowing.
    pub fn merge(&mut self, other: &IncomeLedger) {
        for (mechanic, amount) in other.iter() {
            self.credit(mechanic, amount);
        }
    }

    pub fn get(&self, mechanic: &str) -> Option<i64> {
        self.index
            .get(mechanic)
            .map(|&position| self.totals[position].1)
    }

    /// Total for the mechanic, zero when nothing was credited.
    pub fn income_for(&self, mechanic: &str) -> i64 {
        self.get(mechanic).unwrap_or(0)
    }

    pub fn contains(&self, mechanic: &str) -> bool {
        self.index.contains_key(mechanic)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.totals
            .iter()
            .map(|(mechanic, amount)| (mechanic.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl PartialEq for IncomeLedger {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(mechanic, amount)| other.get(mechanic) == Some(amount))
    }
}

impl Eq for IncomeLedger {}

impl<'a> FromIterator<(&'a str, i64)> for IncomeLedger {
    fn from_iter<T: IntoIterator<Item = (&'a str, i64)>>(iter: T) -> Self {
        let mut ledger = IncomeLedger::new();
        for (mechanic, amount) in iter {
            ledger.credit(mechanic, amount);
        }
        ledger
    }
}
