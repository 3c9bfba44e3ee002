//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - history points: `o`
//! - forecast points: `+`

use crate::domain::{ForecastSeries, MonthlySeries};

/// Render history and forecast on one time axis.
pub fn render_ascii_plot(
    monthly: &MonthlySeries,
    forecast: &ForecastSeries,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let history: Vec<f64> = monthly.values();
    let future: Vec<f64> = forecast.points.iter().map(|p| p.quantity as f64).collect();
    let n = history.len() + future.len();
    if n == 0 {
        return "Plot: (no data)\n".to_string();
    }

    let (y_min, y_max) = value_range(&history, &future).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for (i, &v) in history.iter().enumerate() {
        let x = map_x(i, n, width);
        let y = map_y(v, y_min, y_max, height);
        grid[y][x] = 'o';
    }
    for (j, &v) in future.iter().enumerate() {
        let x = map_x(history.len() + j, n, width);
        let y = map_y(v, y_min, y_max, height);
        grid[y][x] = '+';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    let from = monthly.points.first().map(|p| p.month.to_string()).unwrap_or_default();
    let to = forecast
        .points
        .last()
        .map(|p| p.month.to_string())
        .or_else(|| monthly.points.last().map(|p| p.month.to_string()))
        .unwrap_or_default();
    out.push_str(&format!(
        "Plot: months=[{from} .. {to}] | qty=[{y_min:.1}, {y_max:.1}] | o=history +=forecast\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn value_range(history: &[f64], future: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in history.iter().chain(future.iter()) {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, pad: f64) -> (f64, f64) {
    if (max - min).abs() < 1e-9 {
        return (min - 1.0, max + 1.0);
    }
    let span = max - min;
    (min - span * pad, max + span * pad)
}

fn map_x(idx: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = idx as f64 / (n as f64 - 1.0);
    ((u * (width as f64 - 1.0)).round() as usize).min(width - 1)
}

fn map_y(value: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((value - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the grid.
    let row = ((1.0 - u) * (height as f64 - 1.0)).round() as usize;
    row.min(height - 1)
}
