//! End-to-end pipeline scenarios: CSV bytes in, forecast out.

use std::io::Read;
use std::path::PathBuf;

use demanda::app::pipeline::run_forecast;
use demanda::data::monthly::next_month;
use demanda::data::sample::{generate_sales, SampleSpec};
use demanda::domain::{ForecastConfig, SeasonalMode, TrendMode};
use demanda::error::AppError;
use demanda::io::cache::TableCache;
use demanda::io::export::forecast_workbook;
use demanda::io::ingest::parse_sales_csv;

/// Build CSV bytes with one row per month for a single item.
fn monthly_csv(item: &str, quantities: &[f64]) -> Vec<u8> {
    let mut out = String::from("data,item,quantità\n");
    for (i, q) in quantities.iter().enumerate() {
        let year = 2022 + i / 12;
        let month = i % 12 + 1;
        out.push_str(&format!("{year}-{month:02}-15,{item},{q}\n"));
    }
    out.into_bytes()
}

fn config(item: &str) -> ForecastConfig {
    ForecastConfig {
        input: PathBuf::from("unused.csv"),
        item: item.to_string(),
        horizon: 12,
        seasonal_periods: 12,
        trend: TrendMode::None,
        seasonal: SeasonalMode::None,
        grid_steps: 10,
        plot: false,
        plot_width: 100,
        plot_height: 25,
        export_xlsx: None,
        export_json: None,
    }
}

#[test]
fn loaded_table_is_sorted_even_when_csv_is_not() {
    let csv = b"data,item,quantit\xc3\xa0\n2024-06-01,A,1\n2023-01-01,A,2\n2024-01-01,A,3\n";
    let table = parse_sales_csv(csv).unwrap();
    assert!(table.records.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn monthly_series_has_uniform_spacing_and_no_gaps() {
    // Two distant observations; every month in between must be present.
    let csv = b"data,item,quantit\xc3\xa0\n2022-01-10,A,5\n2023-12-20,A,7\n";
    let table = parse_sales_csv(csv).unwrap();
    let out = run_forecast(&table, &config("A")).unwrap();
    assert_eq!(out.monthly.len(), 24);
    for w in out.monthly.points.windows(2) {
        assert_eq!(next_month(w[0].month), w[1].month);
    }
}

#[test]
fn forecast_length_equals_requested_horizon() {
    let table = parse_sales_csv(&monthly_csv("A", &[10.0; 30])).unwrap();
    for horizon in [1usize, 6, 12, 36] {
        let mut c = config("A");
        c.horizon = horizon;
        let out = run_forecast(&table, &c).unwrap();
        assert_eq!(out.forecast.len(), horizon);
    }
}

#[test]
fn constant_history_yields_the_constant_forecast() {
    // 24 months of 10, no trend, no seasonality: the projection is 10.
    let table = parse_sales_csv(&monthly_csv("A", &[10.0; 24])).unwrap();
    let out = run_forecast(&table, &config("A")).unwrap();
    assert_eq!(out.forecast.len(), 12);
    assert!(out.forecast.points.iter().all(|p| p.quantity == 10));
}

#[test]
fn noisy_history_still_yields_non_negative_integers() {
    let values: Vec<f64> = (0..36)
        .map(|t| (30.0 + 20.0 * ((t % 12) as f64 - 6.0) / 6.0).max(0.0))
        .collect();
    let table = parse_sales_csv(&monthly_csv("A", &values)).unwrap();
    let mut c = config("A");
    c.trend = TrendMode::Additive;
    c.seasonal = SeasonalMode::Additive;
    let out = run_forecast(&table, &c).unwrap();
    // Quantities are u64 by construction; the clamp is what keeps the cast
    // from ever seeing a negative model output.
    assert_eq!(out.forecast.len(), 12);
}

#[test]
fn short_history_halts_with_data_insufficiency() {
    let table = parse_sales_csv(&monthly_csv("A", &[10.0; 20])).unwrap();
    let err = run_forecast(&table, &config("A")).unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientData { got: 20, needed: 24, period: 12 }
    ));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn multiplicative_seasonal_with_zero_month_reports_model_fit_error() {
    let mut values = vec![10.0; 24];
    values[7] = 0.0;
    let table = parse_sales_csv(&monthly_csv("A", &values)).unwrap();
    let mut c = config("A");
    c.seasonal = SeasonalMode::Multiplicative;
    let err = run_forecast(&table, &c).unwrap_err();
    assert!(matches!(err, AppError::ModelFit(_)));
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn unknown_item_is_reported_before_fitting() {
    let table = parse_sales_csv(&monthly_csv("A", &[10.0; 24])).unwrap();
    let err = run_forecast(&table, &config("MISSING")).unwrap_err();
    assert!(matches!(err, AppError::UnknownItem { .. }));
}

#[test]
fn workbook_round_trips_months_and_values() {
    let table = parse_sales_csv(&monthly_csv("A", &[10.0; 24])).unwrap();
    let out = run_forecast(&table, &config("A")).unwrap();
    let buffer = forecast_workbook(&out.forecast).unwrap();

    // xlsx is a zip archive: inline numbers live in the sheet XML, strings in
    // the shared-strings table.
    let cursor = std::io::Cursor::new(buffer);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();

    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();
    let mut strings = String::new();
    archive
        .by_name("xl/sharedStrings.xml")
        .unwrap()
        .read_to_string(&mut strings)
        .unwrap();

    for p in &out.forecast.points {
        assert!(
            strings.contains(&p.month.format("%Y-%m-%d").to_string()),
            "month {} missing from workbook",
            p.month
        );
        assert!(
            sheet.contains(&format!("<v>{}</v>", p.quantity)),
            "value {} missing from workbook",
            p.quantity
        );
    }
    assert!(strings.contains("previsione"));
}

#[test]
fn cache_returns_the_same_table_for_identical_bytes() {
    let bytes = monthly_csv("A", &[10.0; 24]);
    let mut cache = TableCache::new();
    let a = cache.load(&bytes).unwrap();
    let b = cache.load(&bytes).unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}

#[test]
fn generated_sample_flows_through_the_whole_pipeline() {
    let records = generate_sales(&SampleSpec {
        items: 2,
        months: 36,
        seed: 7,
        start: "2021-01-01".parse().unwrap(),
    })
    .unwrap();

    let mut csv = String::from("data,item,quantità\n");
    for r in &records {
        csv.push_str(&format!("{},{},{}\n", r.date, r.item, r.quantity));
    }
    let table = parse_sales_csv(csv.as_bytes()).unwrap();

    let mut c = config("ITEM-01");
    c.trend = TrendMode::Additive;
    c.seasonal = SeasonalMode::Additive;
    let out = run_forecast(&table, &c).unwrap();
    assert_eq!(out.forecast.len(), 12);
    assert_eq!(out.monthly.len(), 36);
}
