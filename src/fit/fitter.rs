//! Grid-search fitting of the smoothing model.
//!
//! Given:
//! - the monthly values `y_t`
//! - trend/seasonal modes and the seasonal period
//! - a list of candidate smoothing-parameter tuples
//!
//! we run the recursion for each candidate, score it by one-step-ahead SSE,
//! and return the best (lowest SSE) candidate. Non-finite candidates are
//! skipped; if none survive, fitting fails rather than returning garbage.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{FitQuality, SeasonalMode, SmoothingParams, TrendMode};
use crate::error::AppError;
use crate::fit::grid::param_grid;
use crate::models::holt_winters::{run_smoothing, HwRun, HwState};

/// A fitted model: estimated parameters plus the final smoothing state,
/// ready for projection.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub params: SmoothingParams,
    pub state: HwState,
    pub quality: FitQuality,
}

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    params: SmoothingParams,
    run: HwRun,
}

/// Fit the smoothing model over a parameter grid.
pub fn fit_model(
    values: &[f64],
    trend: TrendMode,
    seasonal: SeasonalMode,
    period: usize,
    grid_steps: usize,
) -> Result<FittedModel, AppError> {
    if values.is_empty() {
        return Err(AppError::ModelFit("No data points to fit.".to_string()));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AppError::ModelFit(
            "Series contains non-finite values.".to_string(),
        ));
    }
    if seasonal != SeasonalMode::None {
        if period == 0 {
            return Err(AppError::InvalidParam(
                "seasonal_periods must be >= 1 when a seasonal component is enabled.".to_string(),
            ));
        }
        // The pipeline checks this at the aggregation boundary; re-checking
        // here keeps direct library callers from fitting on a partial season.
        if values.len() < 2 * period {
            return Err(AppError::InsufficientData {
                got: values.len(),
                needed: 2 * period,
                period,
            });
        }
    }
    ensure_mode_compatibility(values, trend, seasonal)?;

    let grid = param_grid(trend, seasonal, grid_steps)?;

    // Evaluate each candidate independently (parallel).
    let candidates: Vec<Candidate> = grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, params)| {
            let run = run_smoothing(values, params, trend, seasonal, period);
            if run.sse.is_finite() && run.state.level.is_finite() {
                Some(Candidate {
                    idx,
                    params: *params,
                    run,
                })
            } else {
                None
            }
        })
        .collect();

    if candidates.is_empty() {
        return Err(AppError::ModelFit(format!(
            "No valid parameter candidates for trend={}, seasonal={}. Try setting a mode to \
             `none` or adjusting --seasonal-periods.",
            trend.display_name(),
            seasonal.display_name()
        )));
    }

    // Deterministic selection: minimum SSE; break ties by original grid index.
    let mut best = &candidates[0];
    for c in &candidates[1..] {
        if c.run.sse < best.run.sse || (c.run.sse == best.run.sse && c.idx < best.idx) {
            best = c;
        }
    }

    let n_fit = best.run.n_fit.max(1);
    let quality = FitQuality {
        sse: best.run.sse,
        rmse: (best.run.sse / n_fit as f64).sqrt(),
        n_fit: best.run.n_fit,
    };

    debug!(
        alpha = best.params.alpha,
        beta = ?best.params.beta,
        gamma = ?best.params.gamma,
        sse = quality.sse,
        candidates = candidates.len(),
        "smoothing parameters estimated"
    );

    Ok(FittedModel {
        params: best.params,
        state: best.run.state.clone(),
        quality,
    })
}

/// Multiplicative components divide by the data; refuse series that would
/// make those recursions degenerate instead of letting NaN propagate.
fn ensure_mode_compatibility(
    values: &[f64],
    trend: TrendMode,
    seasonal: SeasonalMode,
) -> Result<(), AppError> {
    let needs_positive =
        trend == TrendMode::Multiplicative || seasonal == SeasonalMode::Multiplicative;
    if needs_positive && values.iter().any(|&v| v <= 0.0) {
        let which = if seasonal == SeasonalMode::Multiplicative {
            "seasonal"
        } else {
            "trend"
        };
        return Err(AppError::ModelFit(format!(
            "multiplicative {which} mode requires strictly positive history, but the series \
             contains zero or negative months. Switch --{which} to `none` or `additive`, or \
             adjust --seasonal-periods."
        )));
    }
    Ok(())
}
