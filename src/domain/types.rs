//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/xlsx
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Hard ceiling on the forecast horizon (months).
pub const MAX_HORIZON: usize = 36;

/// Trend component of the smoothing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrendMode {
    /// No trend component (level-only or level+seasonal).
    None,
    /// Linear trend: the level changes by an estimated amount per month.
    Additive,
    /// Exponential trend: the level changes by an estimated factor per month.
    ///
    /// Requires strictly positive history.
    Multiplicative,
}

/// Seasonal component of the smoothing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalMode {
    /// No seasonal component.
    None,
    /// Seasonal offsets added to the level.
    Additive,
    /// Seasonal factors multiplying the level.
    ///
    /// Requires strictly positive history.
    Multiplicative,
}

impl TrendMode {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            TrendMode::None => "none",
            TrendMode::Additive => "additive",
            TrendMode::Multiplicative => "multiplicative",
        }
    }
}

impl SeasonalMode {
    pub fn display_name(self) -> &'static str {
        match self {
            SeasonalMode::None => "none",
            SeasonalMode::Additive => "additive",
            SeasonalMode::Multiplicative => "multiplicative",
        }
    }
}

/// One row of the uploaded sales CSV. Source of truth; immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub item: String,
    pub quantity: f64,
}

/// A row-level problem encountered during ingest.
///
/// Bad rows are skipped, not fatal; they are kept so the report can tell the
/// user what was dropped.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// All usable sales records, sorted ascending by date.
///
/// Invariant: dates are non-decreasing after load.
#[derive(Debug, Clone)]
pub struct SalesTable {
    pub records: Vec<SalesRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl SalesTable {
    /// Distinct item identifiers, sorted, with record counts.
    pub fn items(&self) -> Vec<(String, usize)> {
        let mut counts = std::collections::BTreeMap::<&str, usize>::new();
        for r in &self.records {
            *counts.entry(r.item.as_str()).or_default() += 1;
        }
        counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Date span covered by the records of one item.
    pub fn item_span(&self, item: &str) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter(|r| r.item == item).map(|r| r.date);
        let first = dates.next()?;
        let last = dates.last().unwrap_or(first);
        Some((first, last))
    }
}

/// One month-start bucket of aggregated demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: NaiveDate,
    pub quantity: f64,
}

/// One item's demand resampled to consecutive month-start buckets.
///
/// Invariant: `points` covers every calendar month between its first and last
/// entry exactly once (missing source months are zero-filled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub item: String,
    pub points: Vec<MonthlyPoint>,
}

impl MonthlySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.quantity).collect()
    }

    pub fn last_month(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.month)
    }
}

/// One forecast month: a non-negative integer quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: NaiveDate,
    pub quantity: u64,
}

/// The projected demand, starting one month after the history ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub item: String,
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Estimated smoothing parameters.
///
/// `beta`/`gamma` are `None` when the corresponding component is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

/// Fit quality diagnostics over the one-step-ahead training errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    /// Number of one-step-ahead errors the SSE was computed over.
    pub n_fit: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub input: PathBuf,
    pub item: String,

    /// Forecast horizon in months (1..=36).
    pub horizon: usize,
    /// Time steps per seasonal cycle (12 for yearly seasonality on monthly data).
    pub seasonal_periods: usize,
    pub trend: TrendMode,
    pub seasonal: SeasonalMode,

    /// Grid points per active smoothing parameter.
    pub grid_steps: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_xlsx: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl ForecastConfig {
    /// Validate user-adjustable parameters before running the pipeline.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.horizon == 0 || self.horizon > MAX_HORIZON {
            return Err(AppError::InvalidParam(format!(
                "horizon must be between 1 and {MAX_HORIZON} months, got {}.",
                self.horizon
            )));
        }
        if self.seasonal_periods == 0 {
            return Err(AppError::InvalidParam(
                "seasonal_periods must be >= 1.".to_string(),
            ));
        }
        if self.grid_steps < 2 {
            return Err(AppError::InvalidParam(
                "grid_steps must be >= 2.".to_string(),
            ));
        }
        Ok(())
    }
}

/// A saved forecast file (JSON).
///
/// The "portable" representation of one run: configuration echo, estimated
/// parameters, fit quality, and both series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub item: String,
    pub trend: TrendMode,
    pub seasonal: SeasonalMode,
    pub seasonal_periods: usize,
    pub horizon: usize,
    pub params: SmoothingParams,
    pub quality: FitQuality,
    pub history: Vec<MonthlyPoint>,
    pub forecast: Vec<ForecastPoint>,
}
