//! Month-start resampling of one item's sales.
//!
//! The smoothing model downstream assumes fixed-frequency input, so the
//! aggregator must produce a strictly regular monthly series: one bucket per
//! calendar month between the first and last observation, quantities summed
//! within each bucket, months with no source rows filled with zero.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use crate::domain::{MonthlyPoint, MonthlySeries, SalesTable};
use crate::error::AppError;

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // The first of any month always exists, so this cannot fail.
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("first of month")
}

/// The month-start immediately after `month`.
pub fn next_month(month: NaiveDate) -> NaiveDate {
    month
        .checked_add_months(Months::new(1))
        .expect("month arithmetic within chrono range")
}

/// Filter `table` to one item and resample to consecutive month-start buckets.
pub fn aggregate_monthly(table: &SalesTable, item: &str) -> Result<MonthlySeries, AppError> {
    let mut buckets = BTreeMap::<NaiveDate, f64>::new();
    let mut matched = 0usize;

    for record in table.records.iter().filter(|r| r.item == item) {
        matched += 1;
        *buckets.entry(month_start(record.date)).or_insert(0.0) += record.quantity;
    }

    if matched == 0 {
        return Err(AppError::UnknownItem {
            item: item.to_string(),
        });
    }

    let first = *buckets.keys().next().expect("non-empty buckets");
    let last = *buckets.keys().next_back().expect("non-empty buckets");

    let mut points = Vec::new();
    let mut month = first;
    while month <= last {
        let quantity = buckets.get(&month).copied().unwrap_or(0.0);
        points.push(MonthlyPoint { month, quantity });
        month = next_month(month);
    }

    debug!(
        item,
        records = matched,
        months = points.len(),
        from = %first,
        to = %last,
        "aggregated to monthly frequency"
    );

    Ok(MonthlySeries {
        item: item.to_string(),
        points,
    })
}

/// Enforce the two-full-cycles minimum before any fit is attempted.
///
/// Forecasting with less than two complete seasonal cycles is considered
/// invalid, so the pipeline halts here rather than producing a low-confidence
/// fit.
pub fn ensure_sufficient(series: &MonthlySeries, seasonal_periods: usize) -> Result<(), AppError> {
    let needed = 2 * seasonal_periods;
    if series.len() < needed {
        return Err(AppError::InsufficientData {
            got: series.len(),
            needed,
            period: seasonal_periods,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;

    fn table(rows: &[(&str, &str, f64)]) -> SalesTable {
        let records = rows
            .iter()
            .map(|(d, item, q)| SalesRecord {
                date: d.parse().unwrap(),
                item: item.to_string(),
                quantity: *q,
            })
            .collect();
        SalesTable {
            records,
            row_errors: vec![],
            rows_read: rows.len(),
        }
    }

    #[test]
    fn sums_within_month_and_zero_fills_gaps() {
        let t = table(&[
            ("2024-01-05", "A", 2.0),
            ("2024-01-20", "A", 3.0),
            // February has no rows at all.
            ("2024-03-01", "A", 7.0),
            ("2024-02-10", "B", 99.0),
        ]);
        let series = aggregate_monthly(&t, "A").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.points[0].quantity, 5.0);
        assert_eq!(series.points[1].quantity, 0.0);
        assert_eq!(series.points[2].quantity, 7.0);
    }

    #[test]
    fn spacing_is_exactly_one_month() {
        let t = table(&[("2023-11-03", "A", 1.0), ("2024-04-28", "A", 1.0)]);
        let series = aggregate_monthly(&t, "A").unwrap();
        assert_eq!(series.len(), 6);
        for w in series.points.windows(2) {
            assert_eq!(next_month(w[0].month), w[1].month);
        }
    }

    #[test]
    fn unknown_item_is_rejected() {
        let t = table(&[("2024-01-01", "A", 1.0)]);
        let err = aggregate_monthly(&t, "Z").unwrap_err();
        assert!(matches!(err, AppError::UnknownItem { .. }));
    }

    #[test]
    fn sufficiency_guard_uses_two_full_cycles() {
        let t = table(&[("2024-01-01", "A", 1.0), ("2024-06-01", "A", 1.0)]);
        let series = aggregate_monthly(&t, "A").unwrap();
        // 6 points: enough for period 3, not for period 4.
        assert!(ensure_sufficient(&series, 3).is_ok());
        let err = ensure_sufficient(&series, 4).unwrap_err();
        assert!(matches!(err, AppError::InsufficientData { needed: 8, got: 6, .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn year_boundary_is_handled() {
        let t = table(&[("2023-12-15", "A", 1.0), ("2024-01-15", "A", 2.0)]);
        let series = aggregate_monthly(&t, "A").unwrap();
        assert_eq!(series.points[0].month, "2023-12-01".parse().unwrap());
        assert_eq!(series.points[1].month, "2024-01-01".parse().unwrap());
    }
}
