//! Shared forecasting pipeline used by every front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! aggregate -> sufficiency guard -> fit -> project -> discretize
//!
//! The CLI (and any future shell) can then focus on presentation: it loads a
//! table, calls `run_forecast`, and renders the result.

use tracing::info;

use crate::data::monthly::{aggregate_monthly, ensure_sufficient};
use crate::domain::{ForecastConfig, ForecastSeries, MonthlySeries, SalesTable};
use crate::error::AppError;
use crate::fit::{fit_model, FittedModel};
use crate::models::holt_winters::project;
use crate::report::{build_forecast, discretize};

/// All computed outputs of a single forecast run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub monthly: MonthlySeries,
    pub forecast: ForecastSeries,
    pub fit: FittedModel,
}

/// Execute the full forecasting pipeline and return the computed outputs.
///
/// Pure given its inputs: no I/O, no UI state. Errors halt at the first
/// failing stage; no partial output is returned.
pub fn run_forecast(table: &SalesTable, config: &ForecastConfig) -> Result<RunOutput, AppError> {
    // 1) Validate user-adjustable parameters.
    config.validate()?;

    // 2) Filter to the selected item and resample to monthly frequency.
    let monthly = aggregate_monthly(table, &config.item)?;

    // 3) Require two full seasonal cycles before fitting.
    ensure_sufficient(&monthly, config.seasonal_periods)?;

    // 4) Estimate smoothing parameters and the final state.
    let values = monthly.values();
    let fit = fit_model(
        &values,
        config.trend,
        config.seasonal,
        config.seasonal_periods,
        config.grid_steps,
    )?;

    // 5) Project the horizon and clamp to non-negative integers.
    let raw = project(
        &fit.state,
        values.len(),
        config.horizon,
        config.trend,
        config.seasonal,
        config.seasonal_periods,
    );
    let quantities = discretize(&raw)?;
    let forecast = build_forecast(&monthly, &quantities);

    info!(
        item = %config.item,
        months = monthly.len(),
        horizon = forecast.len(),
        sse = fit.quality.sse,
        "forecast computed"
    );

    Ok(RunOutput {
        monthly,
        forecast,
        fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SalesRecord, SeasonalMode, TrendMode};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn monthly_table(item: &str, quantities: &[f64]) -> SalesTable {
        let records = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| SalesRecord {
                date: NaiveDate::from_ymd_opt(2022 + i as i32 / 12, (i % 12) as u32 + 1, 15)
                    .unwrap(),
                item: item.to_string(),
                quantity: q,
            })
            .collect();
        SalesTable {
            records,
            row_errors: vec![],
            rows_read: quantities.len(),
        }
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
    fn constant_history_forecasts_the_constant() {
        let table = monthly_table("A", &[10.0; 24]);
        let out = run_forecast(&table, &config("A")).unwrap();
        assert_eq!(out.forecast.len(), 12);
        for p in &out.forecast.points {
            assert_eq!(p.quantity, 10);
        }
    }

    #[test]
    fn horizon_is_honored_exactly() {
        let table = monthly_table("A", &[10.0; 24]);
        let mut c = config("A");
        c.horizon = 5;
        let out = run_forecast(&table, &c).unwrap();
        assert_eq!(out.forecast.len(), 5);
    }

    #[test]
    fn short_history_halts_with_insufficient_data() {
        let table = monthly_table("A", &[10.0; 23]);
        let err = run_forecast(&table, &config("A")).unwrap_err();
        assert!(matches!(err, AppError::InsufficientData { .. }));
    }

    #[test]
    fn forecast_starts_right_after_history() {
        let table = monthly_table("A", &[10.0; 24]);
        let out = run_forecast(&table, &config("A")).unwrap();
        let last = out.monthly.last_month().unwrap();
        let first_fc = out.forecast.points[0].month;
        assert_eq!(crate::data::monthly::next_month(last), first_fc);
    }
}
