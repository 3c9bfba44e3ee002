//! Forecast exports: xlsx workbook and forecast JSON.
//!
//! The workbook is built fully in memory (`forecast_workbook` returns the
//! byte buffer) so callers can stream it to a download without disk I/O; the
//! CLI writes the same buffer to a file. Identical input yields identical
//! bytes: the document creation timestamp is pinned to a constant.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};

use crate::domain::{ForecastConfig, ForecastFile, ForecastSeries, MonthlySeries};
use crate::error::AppError;
use crate::fit::FittedModel;

/// MIME type of the exported workbook.
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Default workbook file name for an item.
pub fn default_workbook_name(item: &str) -> String {
    format!("previsione_domanda_{item}.xlsx")
}

/// Build the forecast workbook in memory: one sheet, a labeled date column
/// and the values column.
pub fn forecast_workbook(forecast: &ForecastSeries) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();

    // Pin the creation timestamp so identical input produces identical bytes.
    let epoch = ExcelDateTime::from_ymd(2000, 1, 1)
        .map_err(|e| AppError::Export(format!("Invalid workbook timestamp: {e}")))?;
    let properties = DocProperties::new().set_creation_datetime(&epoch);
    workbook.set_properties(&properties);

    let sheet = workbook.add_worksheet();
    sheet
        .set_name("Previsione")
        .map_err(|e| AppError::Export(format!("Failed to name worksheet: {e}")))?;

    let header = Format::new().set_bold();
    sheet
        .write_with_format(0, 0, "data", &header)
        .map_err(|e| AppError::Export(format!("Failed to write header: {e}")))?;
    sheet
        .write_with_format(0, 1, "previsione", &header)
        .map_err(|e| AppError::Export(format!("Failed to write header: {e}")))?;

    for (i, p) in forecast.points.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet
            .write(row, 0, p.month.format("%Y-%m-%d").to_string())
            .map_err(|e| AppError::Export(format!("Failed to write date cell: {e}")))?;
        sheet
            .write(row, 1, p.quantity as f64)
            .map_err(|e| AppError::Export(format!("Failed to write value cell: {e}")))?;
    }

    sheet
        .set_column_width(0, 12)
        .map_err(|e| AppError::Export(format!("Failed to size column: {e}")))?;

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::Export(format!("Failed to build workbook: {e}")))
}

/// Write the forecast workbook to disk.
///
/// A directory target resolves to `previsione_domanda_{item}.xlsx` inside it.
pub fn write_forecast_xlsx(path: &Path, forecast: &ForecastSeries) -> Result<PathBuf, AppError> {
    let path = if path.is_dir() {
        path.join(default_workbook_name(&forecast.item))
    } else {
        path.to_path_buf()
    };

    let buffer = forecast_workbook(forecast)?;
    std::fs::write(&path, buffer)
        .map_err(|e| AppError::Export(format!("Failed to write '{}': {e}", path.display())))?;
    Ok(path)
}

/// Assemble the portable JSON representation of one run.
pub fn build_forecast_file(
    monthly: &MonthlySeries,
    forecast: &ForecastSeries,
    fit: &FittedModel,
    config: &ForecastConfig,
) -> ForecastFile {
    ForecastFile {
        tool: "demanda".to_string(),
        item: config.item.clone(),
        trend: config.trend,
        seasonal: config.seasonal,
        seasonal_periods: config.seasonal_periods,
        horizon: config.horizon,
        params: fit.params,
        quality: fit.quality.clone(),
        history: monthly.points.clone(),
        forecast: forecast.points.clone(),
    }
}

/// Write the forecast JSON file.
pub fn write_forecast_json(path: &Path, file: &ForecastFile) -> Result<(), AppError> {
    let out = std::fs::File::create(path)
        .map_err(|e| AppError::Export(format!("Failed to create '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::Export(format!("Failed to write forecast JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ForecastPoint;

    fn forecast() -> ForecastSeries {
        ForecastSeries {
            item: "WIDGET".to_string(),
            points: vec![
                ForecastPoint { month: "2025-01-01".parse().unwrap(), quantity: 12 },
                ForecastPoint { month: "2025-02-01".parse().unwrap(), quantity: 9 },
            ],
        }
    }

    #[test]
    fn workbook_is_a_zip_container() {
        let buf = forecast_workbook(&forecast()).unwrap();
        // xlsx is a zip archive; the local-file-header magic is "PK\x03\x04".
        assert!(buf.len() > 4);
        assert_eq!(&buf[..4], b"PK\x03\x04");
    }

    #[test]
    fn workbook_bytes_are_deterministic() {
        let a = forecast_workbook(&forecast()).unwrap();
        let b = forecast_workbook(&forecast()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn default_name_follows_the_item() {
        assert_eq!(
            default_workbook_name("WIDGET"),
            "previsione_domanda_WIDGET.xlsx"
        );
    }
}
