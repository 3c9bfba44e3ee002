//! Command-line parsing for the demand forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline/model code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{SeasonalMode, TrendMode};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "demanda",
    version,
    about = "Demand forecasting from sales CSVs (Holt-Winters exponential smoothing)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a smoothing model to one item's history and print/export the forecast.
    Forecast(ForecastArgs),
    /// List the distinct item identifiers found in a sales CSV.
    Items(ItemsArgs),
    /// Generate a synthetic sales CSV for trying the tool.
    Sample(SampleArgs),
}

/// Options for the `forecast` subcommand.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Sales CSV with `data`, `item`, `quantità` columns.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Item identifier to forecast (see the `items` subcommand).
    #[arg(long)]
    pub item: String,

    /// Forecast horizon in months (1-36).
    #[arg(long, default_value_t = 12)]
    pub horizon: usize,

    /// Time steps per seasonal cycle (12 = yearly seasonality).
    #[arg(long, default_value_t = 12)]
    pub seasonal_periods: usize,

    /// Trend component mode.
    #[arg(long, value_enum, default_value_t = TrendMode::Additive)]
    pub trend: TrendMode,

    /// Seasonal component mode.
    #[arg(long, value_enum, default_value_t = SeasonalMode::Additive)]
    pub seasonal: SeasonalMode,

    /// Grid points per smoothing parameter during estimation.
    #[arg(long, default_value_t = 10)]
    pub grid_steps: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the forecast to an xlsx workbook.
    ///
    /// A directory target resolves to `previsione_domanda_{item}.xlsx`.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full run (history + forecast + parameters) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for the `items` subcommand.
#[derive(Debug, Parser)]
pub struct ItemsArgs {
    /// Sales CSV with `data`, `item`, `quantità` columns.
    #[arg(short = 'i', long)]
    pub input: PathBuf,
}

/// Options for the `sample` subcommand.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    /// Number of distinct items to generate.
    #[arg(long, default_value_t = 3)]
    pub items: usize,

    /// Months of history per item.
    #[arg(long, default_value_t = 36)]
    pub months: usize,

    /// Random seed (same seed, same file).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First month of generated history.
    #[arg(long, default_value = "2022-01-01")]
    pub start: NaiveDate,
}
