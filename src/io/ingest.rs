//! CSV ingest and normalization.
//!
//! This module is responsible for turning an uploaded sales CSV into a clean,
//! date-sorted `SalesTable` that is safe to aggregate and fit.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (stable sort, no hidden state)
//! - **Separation of concerns**: no aggregation or fitting logic here

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

use crate::domain::{RowError, SalesRecord, SalesTable};
use crate::error::AppError;

/// Read a CSV file from disk and parse it into a `SalesTable`.
pub fn load_sales_table(path: &Path) -> Result<SalesTable, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Load(format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_sales_csv(&bytes)
}

/// Parse CSV bytes into a `SalesTable`.
///
/// Required columns (case-insensitive): `data` (date), `item`, `quantità`.
/// The accent-less spelling `quantita` is accepted as well, since real-world
/// exports frequently lose it.
pub fn parse_sales_csv(bytes: &[u8]) -> Result<SalesTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Load(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => records.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if records.is_empty() {
        return Err(AppError::Load(
            "No valid rows remain after validation.".to_string(),
        ));
    }

    // Stable sort keeps same-day rows in file order, making the table's
    // ascending-date invariant deterministic.
    records.sort_by_key(|r| r.date);

    debug!(
        rows_read,
        rows_used = records.len(),
        rows_skipped = row_errors.len(),
        "sales CSV parsed"
    );

    Ok(SalesTable {
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿data"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    if !header_map.contains_key("data") {
        return Err(AppError::Load("Missing required column: `data`".to_string()));
    }
    if !header_map.contains_key("item") {
        return Err(AppError::Load("Missing required column: `item`".to_string()));
    }
    if !header_map.contains_key("quantità") && !header_map.contains_key("quantita") {
        return Err(AppError::Load(
            "Missing required column: `quantità` (or `quantita`)".to_string(),
        ));
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SalesRecord, String> {
    let date = parse_date(get_required(record, header_map, "data")?)?;
    let item = get_required(record, header_map, "item")?.to_string();

    let quantity_str = get_any_required(record, header_map, &["quantità", "quantita"])?;
    let quantity = quantity_str
        .parse::<f64>()
        .map_err(|_| format!("Invalid `quantità` value '{quantity_str}'."))?;
    if !quantity.is_finite() {
        return Err("Non-finite `quantità` value.".to_string());
    }

    Ok(SalesRecord { date, item, quantity })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_any_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    names: &[&str],
) -> Result<&'a str, String> {
    for name in names {
        if header_map.contains_key(*name) {
            return get_required(record, header_map, name);
        }
    }
    Err(format!("Missing required column: `{}`", names[0]))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but in practice sales exports
    // often use `DD/MM/YYYY` or `DD-MM-YYYY`. We accept a small set of common
    // formats to reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_sorts_ascending() {
        let csv = b"data,item,quantit\xc3\xa0\n2024-03-05,A,3\n2024-01-10,A,1\n2024-02-20,B,2\n";
        let table = parse_sales_csv(csv).unwrap();
        assert_eq!(table.records.len(), 3);
        assert!(table.records.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn accepts_bom_and_ascii_quantita() {
        let csv = b"\xef\xbb\xbfdata,item,quantita\n2024-01-01,A,5\n";
        let table = parse_sales_csv(csv).unwrap();
        assert_eq!(table.records[0].quantity, 5.0);
    }

    #[test]
    fn accepts_common_date_formats() {
        let csv = b"data,item,quantita\n31/01/2024,A,1\n2024-02-01,A,2\n01-03-2024,A,3\n2024/04/01,A,4\n";
        let table = parse_sales_csv(csv).unwrap();
        assert_eq!(table.records.len(), 4);
        assert_eq!(
            table.records[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let csv = b"data,product,quantita\n2024-01-01,A,5\n";
        let err = parse_sales_csv(csv).unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = b"data,item,quantita\nnot-a-date,A,5\n2024-01-01,A,abc\n2024-01-02,A,7\n";
        let table = parse_sales_csv(csv).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.row_errors.len(), 2);
        assert_eq!(table.row_errors[0].line, 2);
    }

    #[test]
    fn all_bad_rows_is_a_load_error() {
        let csv = b"data,item,quantita\nnot-a-date,A,5\n";
        assert!(parse_sales_csv(csv).is_err());
    }
}
