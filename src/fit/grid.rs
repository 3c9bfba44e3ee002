//! Smoothing-parameter grid generation.
//!
//! Parameters are estimated by a deterministic grid search.
//!
//! Why grid search?
//! - It avoids the local minima and tolerance sensitivity of nonlinear
//!   optimizers on short business series.
//! - It is deterministic given the same inputs/flags.
//! - With at most three parameters in (0, 1), a modest grid is fast enough
//!   for interactive use.

use crate::domain::{SeasonalMode, SmoothingParams, TrendMode};
use crate::error::AppError;

/// Search bounds for every smoothing parameter.
///
/// The open interval (0, 1) is closed slightly inward; values at the exact
/// endpoints correspond to degenerate models (frozen or memoryless state).
pub const PARAM_MIN: f64 = 0.05;
pub const PARAM_MAX: f64 = 0.95;

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(AppError::InvalidParam(format!(
            "Invalid parameter range: min={min}, max={max} (must be finite and max>min)."
        )));
    }
    if steps < 2 {
        return Err(AppError::InvalidParam("Grid steps must be >= 2.".to_string()));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| min + step * i as f64).collect())
}

/// Cartesian candidate grid over the active parameters.
///
/// `alpha` is always searched; `beta` only when a trend component is enabled,
/// `gamma` only when a seasonal component is enabled. Candidate order is
/// fixed (alpha outermost) so index tie-breaking is reproducible.
pub fn param_grid(
    trend: TrendMode,
    seasonal: SeasonalMode,
    steps: usize,
) -> Result<Vec<SmoothingParams>, AppError> {
    let axis = lin_space(PARAM_MIN, PARAM_MAX, steps)?;

    let betas: Vec<Option<f64>> = if trend != TrendMode::None {
        axis.iter().copied().map(Some).collect()
    } else {
        vec![None]
    };
    let gammas: Vec<Option<f64>> = if seasonal != SeasonalMode::None {
        axis.iter().copied().map(Some).collect()
    } else {
        vec![None]
    };

    let mut out = Vec::with_capacity(axis.len() * betas.len() * gammas.len());
    for &alpha in &axis {
        for &beta in &betas {
            for &gamma in &gammas {
                out.push(SmoothingParams { alpha, beta, gamma });
            }
        }
    }
    Ok(out)
}
