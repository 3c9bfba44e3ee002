//! Post-processing and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;

use crate::data::monthly::next_month;
use crate::domain::{ForecastPoint, ForecastSeries, MonthlySeries};
use crate::error::AppError;

/// Clamp raw model projections to non-negative integers.
///
/// Demand quantities are discrete, non-negative units: negatives are clamped
/// to zero, then values are rounded half-away-from-zero (`f64::round`).
/// A non-finite projection means the model degenerated and is reported as a
/// fit failure, never silently truncated.
pub fn discretize(raw: &[f64]) -> Result<Vec<u64>, AppError> {
    raw.iter()
        .map(|&v| {
            if !v.is_finite() {
                return Err(AppError::ModelFit(
                    "Non-finite forecast value produced by the model.".to_string(),
                ));
            }
            Ok(v.max(0.0).round() as u64)
        })
        .collect()
}

/// Attach month-start dates to the discretized projections, starting one
/// month after the history ends.
pub fn build_forecast(history: &MonthlySeries, quantities: &[u64]) -> ForecastSeries {
    let mut month = history
        .last_month()
        .map(next_month)
        .expect("history is non-empty by pipeline construction");

    let mut points = Vec::with_capacity(quantities.len());
    for &quantity in quantities {
        points.push(ForecastPoint { month, quantity });
        month = next_month(month);
    }

    ForecastSeries {
        item: history.item.clone(),
        points,
    }
}
