//! Folds the work-order log into per-mechanic income for one reporting window.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::extract::{ExtractError, extract_amount};
use crate::model::{DatePredicate, IncomeLedger, WorkOrder, parse_entry_date};

/// A work order that contributes income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribution<'a> {
    /// Trimmed mechanic name.
    pub mechanic: &'a str,
    pub date: NaiveDate,
    pub amount: i64,
}

/// Why a work order was left out of the totals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("expected 10 fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("unparsable entry date '{value}'")]
    InvalidDate { value: String },

    #[error("entry date {date} is outside the reporting window")]
    OutsideWindow { date: NaiveDate },

    #[error("no mechanic recorded")]
    Unattributed,

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("adding {amount} would overflow the income of {mechanic}")]
    IncomeOverflow { mechanic: String, amount: i64 },
}

/// Evaluates a single raw row against the window.
///
/// Checks run in a fixed order (arity, date, window, mechanic, amount) and
/// the first failing one is reported.
pub fn attribute<'a>(
    fields: &'a [String],
    predicate: &DatePredicate,
) -> Result<Attribution<'a>, SkipReason> {
    let order = WorkOrder::from_fields(fields).ok_or(SkipReason::WrongFieldCount {
        found: fields.len(),
    })?;

    let date = parse_entry_date(order.entry_date).ok_or_else(|| SkipReason::InvalidDate {
        value: order.entry_date.to_string(),
    })?;

    if !predicate.matches(date) {
        return Err(SkipReason::OutsideWindow { date });
    }

    let mechanic = order.mechanic.trim();
    if mechanic.is_empty() {
        return Err(SkipReason::Unattributed);
    }

    let amount = extract_amount(order.final_report)?;

    Ok(Attribution {
        mechanic,
        date,
        amount,
    })
}

/// Sums the income of every attributable work order inside the window.
///
/// Rows that cannot be attributed are skipped and never abort the run; a row
/// contributes either its whole amount or nothing.
#[instrument(level = "info", skip_all, fields(period = %predicate.label(), records = records.len()))]
pub fn aggregate<R: AsRef<[String]>>(records: &[R], predicate: &DatePredicate) -> IncomeLedger {
    let mut ledger = IncomeLedger::new();
    let mut skipped = 0usize;

    for (position, record) in records.iter().enumerate() {
        let credited = attribute(record.as_ref(), predicate).and_then(|attribution| {
            ledger
                .checked_credit(attribution.mechanic, attribution.amount)
                .ok_or_else(|| SkipReason::IncomeOverflow {
                    mechanic: attribution.mechanic.to_string(),
                    amount: attribution.amount,
                })
        });
        if let Err(reason) = credited {
            skipped += 1;
            debug!(position, %reason, "work order skipped");
        }
    }

    info!(mechanics = ledger.len(), skipped, "income aggregated");
    ledger
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, mechanic: &str, narrative: &str) -> Vec<String> {
        vec![
            "12-345-67".to_string(),
            "Sedan".to_string(),
            date.to_string(),
            "Acme".to_string(),
            "Driver".to_string(),
            "0500000000".to_string(),
            mechanic.to_string(),
            String::new(),
            String::new(),
            narrative.to_string(),
        ]
    }

    fn march_2024() -> DatePredicate {
        DatePredicate::month(2024, 3).expect("valid month")
    }

    #[test]
    fn single_record_in_month_is_credited() {
        let records = vec![row("15.03.2024", "Ali", "... شغل 50 شيكل")];
        let ledger = aggregate(&records, &march_2024());

        let expected: IncomeLedger = [("Ali", 50)].into_iter().collect();
        assert_eq!(ledger, expected);
    }

    #[test]
    fn amounts_add_up_per_mechanic_in_any_order() {
        let first = row("01.03.2024", "Ali", "100 شيكل");
        let second = row("20.03.2024", "Ali", "شغل 40 شيكل");

        let forward = aggregate(&[first.clone(), second.clone()], &march_2024());
        let backward = aggregate(&[second, first], &march_2024());

        assert_eq!(forward.get("Ali"), Some(140));
        assert_eq!(forward, backward);
    }

    #[test]
    fn disjoint_mechanics_commute() {
        let ali = row("02.03.2024", "Ali", "10 شيكل");
        let sami = row("03.03.2024", "Sami", "20 شيكل");

        let forward = aggregate(&[ali.clone(), sami.clone()], &march_2024());
        let backward = aggregate(&[sami, ali], &march_2024());

        assert_eq!(forward, backward);
        let order: Vec<&str> = forward.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["Ali", "Sami"]);
    }

    #[test]
    fn records_outside_window_contribute_nothing() {
        let records = vec![
            row("31.03.2024", "Ali", "10 شيكل"),
            row("01.04.2024", "Ali", "1000 شيكل"),
            row("15.03.2023", "Omar", "30 شيكل"),
        ];
        let ledger = aggregate(&records, &march_2024());

        assert_eq!(ledger.get("Ali"), Some(10));
        assert!(!ledger.contains("Omar"));
    }

    #[test]
    fn range_window_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2024, 1, 12).expect("valid date");
        let records = vec![
            row("09.01.2024", "Ali", "1 شيكل"),
            row("10.01.2024", "Ali", "2 شيكل"),
            row("12.01.2024", "Ali", "4 شيكل"),
            row("13.01.2024", "Ali", "8 شيكل"),
        ];
        let ledger = aggregate(&records, &DatePredicate::range(start, end));
        assert_eq!(ledger.get("Ali"), Some(6));
    }

    #[test]
    fn blank_mechanic_creates_no_entry() {
        let records = vec![row("05.03.2024", "   ", "70 شيكل")];
        let ledger = aggregate(&records, &march_2024());
        assert!(ledger.is_empty());

        assert_eq!(
            attribute(&records[0], &march_2024()),
            Err(SkipReason::Unattributed)
        );
    }

    #[test]
    fn mechanic_names_are_trimmed() {
        let records = vec![
            row("05.03.2024", " Ali", "5 شيكل"),
            row("06.03.2024", "Ali  ", "6 شيكل"),
        ];
        let ledger = aggregate(&records, &march_2024());
        let expected: IncomeLedger = [("Ali", 11)].into_iter().collect();
        assert_eq!(ledger, expected);
    }

    #[test]
    fn malformed_records_are_skipped_without_aborting() {
        let mut short = row("05.03.2024", "Ali", "5 شيكل");
        short.pop();
        let mut long = row("05.03.2024", "Ali", "5 شيكل");
        long.push("extra".to_string());

        let records = vec![
            short,
            long,
            row("2024-03-05", "Ali", "5 شيكل"),
            row("05.03.2024", "Ali", "no price here"),
            row("05.03.2024", "Ali", "12.5 شيكل"),
            row("06.03.2024", "Ali", "9 شيكل"),
        ];
        let ledger = aggregate(&records, &march_2024());

        assert_eq!(ledger.get("Ali"), Some(9));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn skip_reasons_are_reported_in_check_order() {
        let predicate = march_2024();

        assert_eq!(
            attribute(&["x".to_string()], &predicate),
            Err(SkipReason::WrongFieldCount { found: 1 })
        );
        assert_eq!(
            attribute(&row("31.02.2024", "", "x"), &predicate),
            Err(SkipReason::InvalidDate {
                value: "31.02.2024".to_string()
            })
        );
        assert_eq!(
            attribute(&row("01.04.2024", "", "x"), &predicate),
            Err(SkipReason::OutsideWindow {
                date: NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date")
            })
        );
        assert_eq!(
            attribute(&row("01.03.2024", "Ali", "x"), &predicate),
            Err(SkipReason::Extraction(ExtractError::NoCurrencyMarker))
        );
    }

    #[test]
    fn overflowing_record_is_skipped_and_later_records_still_count() {
        let records = vec![
            row("01.03.2024", "Ali", "9223372036854775807 شيكل"),
            row("02.03.2024", "Ali", "1 شيكل"),
            row("03.03.2024", "Sami", "1 شيكل"),
        ];
        let ledger = aggregate(&records, &march_2024());

        assert_eq!(ledger.get("Ali"), Some(i64::MAX));
        assert_eq!(ledger.get("Sami"), Some(1));
    }

    #[test]
    fn loosely_spelled_dates_are_skipped() {
        let everything = DatePredicate::range(
            NaiveDate::from_ymd_opt(1, 1, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2100, 12, 31).expect("valid date"),
        );
        let records = vec![
            row(" 15.03.2024", "Ali", "5 شيكل"),
            row("15.03.24", "Ali", "7 شيكل"),
        ];

        assert!(aggregate(&records, &everything).is_empty());
        assert_eq!(
            attribute(&records[1], &everything),
            Err(SkipReason::InvalidDate {
                value: "15.03.24".to_string()
            })
        );
    }

    #[test]
    fn unpadded_dates_are_accepted() {
        let records = vec![row("5.3.2024", "Ali", "5 شيكل")];
        assert_eq!(aggregate(&records, &march_2024()).get("Ali"), Some(5));
    }

    #[test]
    fn aggregation_is_repeatable() {
        let records = vec![
            row("01.03.2024", "Ali", "10 شيكل"),
            row("02.03.2024", "Sami", "شغل 20 شيكل"),
            row("03.03.2024", "", "30 شيكل"),
        ];
        let predicate = march_2024();
        assert_eq!(aggregate(&records, &predicate), aggregate(&records, &predicate));
    }

    #[test]
    fn partitioned_runs_merge_to_the_full_result() {
        let records = vec![
            row("01.03.2024", "Ali", "10 شيكل"),
            row("02.03.2024", "Sami", "20 شيكل"),
            row("03.03.2024", "Ali", "30 شيكل"),
            row("04.03.2024", "Omar", "40 شيكل"),
        ];
        let predicate = march_2024();

        let mut merged = aggregate(&records[2..], &predicate);
        merged.merge(&aggregate(&records[..2], &predicate));

        assert_eq!(merged, aggregate(&records, &predicate));
    }
}
