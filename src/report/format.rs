//! Formatted terminal output for the CLI front-end.

use crate::domain::{ForecastConfig, ForecastSeries, MonthlySeries, SalesTable};
use crate::fit::FittedModel;

/// Format the full run summary (dataset stats + fit diagnostics).
pub fn format_run_summary(
    table: &SalesTable,
    monthly: &MonthlySeries,
    fit: &FittedModel,
    config: &ForecastConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== demanda - Demand Forecast ===\n");
    out.push_str(&format!("Item: {}\n", config.item));
    out.push_str(&format!(
        "Model: trend={} seasonal={} seasonal_periods={}\n",
        config.trend.display_name(),
        config.seasonal.display_name(),
        config.seasonal_periods
    ));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        table.rows_read,
        table.records.len(),
        table.row_errors.len()
    ));
    if !table.row_errors.is_empty() {
        for e in table.row_errors.iter().take(5) {
            out.push_str(&format!("  (line {}) {}\n", e.line, e.message));
        }
        if table.row_errors.len() > 5 {
            out.push_str(&format!(
                "  ... and {} more skipped rows\n",
                table.row_errors.len() - 5
            ));
        }
    }

    if let (Some(first), Some(last)) = (monthly.points.first(), monthly.points.last()) {
        out.push_str(&format!(
            "History: {} months | {} .. {}\n",
            monthly.len(),
            first.month,
            last.month
        ));
    }

    out.push_str("\nEstimated parameters:\n");
    out.push_str(&format!("- alpha: {:.4}\n", fit.params.alpha));
    match fit.params.beta {
        Some(beta) => out.push_str(&format!("- beta : {beta:.4}\n")),
        None => out.push_str("- beta : (no trend component)\n"),
    }
    match fit.params.gamma {
        Some(gamma) => out.push_str(&format!("- gamma: {gamma:.4}\n")),
        None => out.push_str("- gamma: (no seasonal component)\n"),
    }
    out.push_str(&format!(
        "- fit  : SSE={:.3} RMSE={:.3} (n={})\n",
        fit.quality.sse, fit.quality.rmse, fit.quality.n_fit
    ));

    out
}

/// Format the forecast as a two-column table.
pub fn format_forecast_table(forecast: &ForecastSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nForecast ({} months):\n", forecast.len()));
    out.push_str("  month       previsione\n");
    for p in &forecast.points {
        out.push_str(&format!("  {}  {:>10}\n", p.month, p.quantity));
    }
    out
}

/// Format the distinct-items listing for the `items` subcommand.
pub fn format_items_table(table: &SalesTable) -> String {
    let items = table.items();
    let mut out = String::new();
    out.push_str(&format!("{} item(s):\n", items.len()));
    out.push_str("  item                     records  from        to\n");
    for (item, count) in &items {
        let (from, to) = table
            .item_span(item)
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .unwrap_or_default();
        out.push_str(&format!("  {item:<24} {count:>7}  {from}  {to}\n"));
    }
    out
}
