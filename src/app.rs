//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads and caches the sales table
//! - runs the forecasting pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ForecastArgs, ItemsArgs, SampleArgs};
use crate::data::sample::{generate_sales, write_sample_csv, SampleSpec};
use crate::domain::ForecastConfig;
use crate::error::AppError;
use crate::io::cache::TableCache;
use crate::io::export::{build_forecast_file, write_forecast_json, write_forecast_xlsx};

pub mod pipeline;

/// Entry point for the `demanda` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Forecast(args) => handle_forecast(args),
        Command::Items(args) => handle_items(args),
        Command::Sample(args) => handle_sample(args),
    }
}

/// Diagnostic logging only; `RUST_LOG` tunes verbosity and nothing else.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args);

    let bytes = std::fs::read(&config.input).map_err(|e| {
        AppError::Load(format!("Failed to open CSV '{}': {e}", config.input.display()))
    })?;

    // One cache per session; repeated runs against identical content reuse
    // the parsed table.
    let mut cache = TableCache::new();
    let table = cache.load(&bytes)?;

    let run = pipeline::run_forecast(&table, &config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&table, &run.monthly, &run.fit, &config)
    );
    println!("{}", crate::report::format_forecast_table(&run.forecast));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.monthly,
            &run.forecast,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_xlsx {
        let written = write_forecast_xlsx(path, &run.forecast)?;
        println!("Saved workbook: {}", written.display());
    }
    if let Some(path) = &config.export_json {
        let file = build_forecast_file(&run.monthly, &run.forecast, &run.fit, &config);
        write_forecast_json(path, &file)?;
        println!("Saved forecast JSON: {}", path.display());
    }

    Ok(())
}

fn handle_items(args: ItemsArgs) -> Result<(), AppError> {
    let table = crate::io::ingest::load_sales_table(&args.input)?;
    println!("{}", crate::report::format_items_table(&table));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        items: args.items,
        months: args.months,
        seed: args.seed,
        start: args.start,
    };
    let records = generate_sales(&spec)?;
    write_sample_csv(&args.out, &records)?;
    println!(
        "Wrote {} records for {} item(s) over {} months to {}",
        records.len(),
        args.items,
        args.months,
        args.out.display()
    );
    Ok(())
}

pub fn forecast_config_from_args(args: &ForecastArgs) -> ForecastConfig {
    ForecastConfig {
        input: args.input.clone(),
        item: args.item.clone(),
        horizon: args.horizon,
        seasonal_periods: args.seasonal_periods,
        trend: args.trend,
        seasonal: args.seasonal,
        grid_steps: args.grid_steps,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_xlsx: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}
