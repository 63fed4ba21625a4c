//! Linear extrapolation of a single column against its row index

use crate::error::{FinsightError, FinsightResult};
use crate::types::Table;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FORECAST_PERIODS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 1-based step past the last row
    pub period: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub column: String,
    pub slope: f64,
    pub intercept: f64,
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Fit `y = slope * x + intercept` by ordinary least squares, with `x` the row index,
/// and predict `periods` rows past the end of the table.
///
/// Rows with a missing value are left out of the fit. A single observation gives a
/// flat forecast.
///
/// # Errors
/// * `UnknownColumn` - no column with that exact name
/// * `NotNumeric` - the column holds text
/// * `InvalidInput` - `periods` is zero
/// * `InsufficientData` - the column has no values
pub fn forecast(table: &Table, column: &str, periods: usize) -> FinsightResult<ForecastSeries> {
    let col = table
        .column(column)
        .ok_or_else(|| FinsightError::UnknownColumn(column.to_string()))?;
    let values = col
        .values
        .as_numbers()
        .ok_or_else(|| FinsightError::NotNumeric(column.to_string()))?;

    if periods == 0 {
        return Err(FinsightError::InvalidInput(
            "periods must be a positive integer".to_string(),
        ));
    }

    let observations: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| Some((row as f64, (*v)?)))
        .collect();

    let (slope, intercept) = fit_line(&observations).ok_or_else(|| {
        FinsightError::InsufficientData(format!("column '{}' has no values", column))
    })?;

    let start = table.row_count();
    let points = (0..periods)
        .map(|step| ForecastPoint {
            period: step + 1,
            value: slope * (start + step) as f64 + intercept,
        })
        .collect();

    tracing::debug!(column, slope, intercept, periods, "forecast fitted");

    Ok(ForecastSeries {
        column: column.to_string(),
        slope,
        intercept,
        points,
    })
}

/// Closed-form simple linear regression; `None` without observations
fn fit_line(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    match points {
        [] => None,
        [(_, y)] => Some((0.0, *y)),
        _ => {
            let n = points.len() as f64;
            let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
            let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

            let (mut sxy, mut sxx) = (0.0, 0.0);
            for (x, y) in points {
                sxy += (x - mean_x) * (y - mean_y);
                sxx += (x - mean_x).powi(2);
            }

            let slope = sxy / sxx;
            Some((slope, mean_y - slope * mean_x))
        }
    }
}
