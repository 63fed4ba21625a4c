//! Descriptive statistics over columns with missing cells
//!
//! Missing cells (`None`) are skipped, never treated as zero.

use serde::{Deserialize, Serialize};

/// Present values of a numeric column, in row order
pub fn present(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().filter_map(|v| *v).collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Per-column summary used by table comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Undefined for fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Summarise a numeric column; `None` when no value is present
    pub fn from_column(values: &[Option<f64>]) -> Option<Self> {
        let data = present(values);
        Some(Self {
            count: data.len(),
            mean: mean(&data)?,
            median: median(&data)?,
            std: sample_std(&data),
            min: min(&data)?,
            max: max(&data)?,
        })
    }
}
