//! Holt-Winters exponential smoothing recursions.
//!
//! The series is decomposed into level, trend, and seasonal components, each
//! updated with exponentially decaying weights. All trend/seasonal mode
//! combinations share one recursion with the composition rules:
//!
//! - additive seasonal: `ŷ_t = (l ∘ b) + s_{t-m}`
//! - multiplicative seasonal: `ŷ_t = (l ∘ b) * s_{t-m}`
//!
//! where `l ∘ b` is `l + h·b` for an additive trend, `l · b^h` for a
//! multiplicative trend, and plain `l` with no trend.
//!
//! This module is deliberately free of fitting logic: given fixed smoothing
//! parameters it runs the recursion and projects forward. Parameter search
//! lives in `crate::fit`.

use crate::domain::{SeasonalMode, SmoothingParams, TrendMode};

/// Guard for divisions inside the multiplicative recursions.
const EPS: f64 = 1e-10;

/// Smoothing state after processing a prefix of the series.
#[derive(Debug, Clone)]
pub struct HwState {
    pub level: f64,
    /// Additive increment or multiplicative factor depending on the trend
    /// mode; unused (identity) when the trend is disabled.
    pub trend: f64,
    /// One entry per season position; empty when seasonality is disabled.
    pub seasonals: Vec<f64>,
}

/// Output of one full recursion pass over the series.
#[derive(Debug, Clone)]
pub struct HwRun {
    pub state: HwState,
    /// Sum of squared one-step-ahead errors.
    pub sse: f64,
    /// Number of one-step-ahead errors contributing to `sse`.
    pub n_fit: usize,
}

/// Compose level and trend `h` steps ahead.
fn level_trend(level: f64, trend: f64, h: usize, mode: TrendMode) -> f64 {
    match mode {
        TrendMode::None => level,
        TrendMode::Additive => level + h as f64 * trend,
        TrendMode::Multiplicative => level * trend.powi(h as i32),
    }
}

/// Apply a seasonal component to a trend-composed level.
fn apply_seasonal(base: f64, s: f64, mode: SeasonalMode) -> f64 {
    match mode {
        SeasonalMode::None => base,
        SeasonalMode::Additive => base + s,
        SeasonalMode::Multiplicative => base * s,
    }
}

/// Estimate the initial level/trend/seasonal state from the data.
///
/// With seasonality: level is the first-season mean, trend the averaged
/// season-over-season change, and the seasonal indices the first season's
/// normalized deviations from the level. Without seasonality: level is the
/// first observation and the trend comes from the first difference (or ratio).
pub fn initialize_state(
    values: &[f64],
    trend: TrendMode,
    seasonal: SeasonalMode,
    period: usize,
) -> HwState {
    if seasonal != SeasonalMode::None && period > 0 && values.len() >= period {
        let first_season = &values[..period];
        let level = first_season.iter().sum::<f64>() / period as f64;

        let trend_init = match trend {
            TrendMode::None => 0.0,
            TrendMode::Additive => {
                if values.len() >= 2 * period {
                    let sum: f64 = (0..period)
                        .map(|i| (values[period + i] - values[i]) / period as f64)
                        .sum();
                    sum / period as f64
                } else {
                    0.0
                }
            }
            TrendMode::Multiplicative => {
                if values.len() >= 2 * period {
                    let second: f64 =
                        values[period..2 * period].iter().sum::<f64>() / period as f64;
                    if level > EPS && second > EPS {
                        (second / level).powf(1.0 / period as f64)
                    } else {
                        1.0
                    }
                } else {
                    1.0
                }
            }
        };

        let mut seasonals: Vec<f64> = match seasonal {
            SeasonalMode::Additive => first_season.iter().map(|y| y - level).collect(),
            SeasonalMode::Multiplicative => first_season
                .iter()
                .map(|y| if level.abs() > EPS { y / level } else { 1.0 })
                .collect(),
            SeasonalMode::None => unreachable!(),
        };
        normalize_seasonals(&mut seasonals, seasonal);

        HwState {
            level,
            trend: trend_init,
            seasonals,
        }
    } else {
        let level = values.first().copied().unwrap_or(0.0);
        let trend_init = match trend {
            TrendMode::None => 0.0,
            TrendMode::Additive => {
                if values.len() >= 2 {
                    values[1] - values[0]
                } else {
                    0.0
                }
            }
            TrendMode::Multiplicative => {
                if values.len() >= 2 && values[0] > EPS {
                    values[1] / values[0]
                } else {
                    1.0
                }
            }
        };
        HwState {
            level,
            trend: trend_init,
            seasonals: Vec::new(),
        }
    }
}

/// Normalize seasonal components to maintain their constraints:
/// additive indices sum to 0, multiplicative indices average to 1.
pub fn normalize_seasonals(seasonals: &mut [f64], mode: SeasonalMode) {
    let period = seasonals.len();
    if period == 0 {
        return;
    }
    match mode {
        SeasonalMode::None => {}
        SeasonalMode::Additive => {
            let adjustment = seasonals.iter().sum::<f64>() / period as f64;
            for s in seasonals.iter_mut() {
                *s -= adjustment;
            }
        }
        SeasonalMode::Multiplicative => {
            let mean = seasonals.iter().sum::<f64>() / period as f64;
            if mean.abs() > EPS {
                for s in seasonals.iter_mut() {
                    *s /= mean;
                }
            }
        }
    }
}

/// Run the smoothing recursion over the whole series with fixed parameters.
///
/// The first season (first observation when non-seasonal) initializes the
/// state and produces no one-step error. Returns the final state and the SSE
/// of the remaining one-step-ahead predictions; the SSE is non-finite when
/// the recursion degenerates, which callers treat as an invalid candidate.
pub fn run_smoothing(
    values: &[f64],
    params: &SmoothingParams,
    trend: TrendMode,
    seasonal: SeasonalMode,
    period: usize,
) -> HwRun {
    let alpha = params.alpha;
    let beta = params.beta.unwrap_or(0.0);
    let gamma = params.gamma.unwrap_or(0.0);

    let mut state = initialize_state(values, trend, seasonal, period);
    let start = if seasonal != SeasonalMode::None { period } else { 1 };

    let mut sse = 0.0;
    let mut n_fit = 0usize;

    for (t, &y) in values.iter().enumerate().skip(start) {
        let s = if seasonal != SeasonalMode::None {
            state.seasonals[t % period]
        } else {
            0.0
        };

        let base = level_trend(state.level, state.trend, 1, trend);
        let pred = apply_seasonal(
            base,
            if seasonal != SeasonalMode::None { s } else { 0.0 },
            seasonal,
        );

        let error = y - pred;
        sse += error * error;
        n_fit += 1;

        let level_prev = state.level;

        // Deseasonalize the observation before the level update.
        let y_adj = match seasonal {
            SeasonalMode::None => y,
            SeasonalMode::Additive => y - s,
            SeasonalMode::Multiplicative => {
                if s.abs() > EPS {
                    y / s
                } else {
                    y
                }
            }
        };

        state.level = alpha * y_adj + (1.0 - alpha) * base;

        match trend {
            TrendMode::None => {}
            TrendMode::Additive => {
                state.trend = beta * (state.level - level_prev) + (1.0 - beta) * state.trend;
            }
            TrendMode::Multiplicative => {
                let ratio = if level_prev.abs() > EPS {
                    state.level / level_prev
                } else {
                    1.0
                };
                state.trend = beta * ratio + (1.0 - beta) * state.trend;
            }
        }

        match seasonal {
            SeasonalMode::None => {}
            SeasonalMode::Additive => {
                state.seasonals[t % period] = gamma * (y - state.level) + (1.0 - gamma) * s;
            }
            SeasonalMode::Multiplicative => {
                if state.level.abs() > EPS {
                    state.seasonals[t % period] =
                        gamma * (y / state.level) + (1.0 - gamma) * s;
                }
            }
        }
    }

    HwRun { state, sse, n_fit }
}

/// Project `horizon` steps past the end of a series of length `n`.
pub fn project(
    state: &HwState,
    n: usize,
    horizon: usize,
    trend: TrendMode,
    seasonal: SeasonalMode,
    period: usize,
) -> Vec<f64> {
    (1..=horizon)
        .map(|h| {
            let base = level_trend(state.level, state.trend, h, trend);
            match seasonal {
                SeasonalMode::None => base,
                _ => {
                    let s = state.seasonals[(n + h - 1) % period];
                    apply_seasonal(base, s, seasonal)
                }
            }
        })
        .collect()
}
