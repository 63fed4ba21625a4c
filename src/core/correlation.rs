//! Pearson correlation matrices over numeric columns

use crate::types::Table;
use serde::{Deserialize, Serialize};

/// How to report correlations involving a zero-variance column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroVariancePolicy {
    /// Every pair touching the column is undefined (`None`), self-pair included
    #[default]
    Undefined,
    /// Self-pair is 1.0, every other pair 0.0
    Uncorrelated,
}

/// Square matrix keyed by column name; `None` marks an undefined coefficient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Coefficient for a pair of columns, `None` if absent or undefined
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.values[i][j]
    }
}

/// Correlation matrix over every numeric column; `None` if the table has none.
///
/// Each pair uses only the rows where both columns have a value.
pub fn correlation_matrix(table: &Table, policy: ZeroVariancePolicy) -> Option<CorrelationMatrix> {
    let numeric: Vec<(&str, &[Option<f64>])> = table
        .numeric_columns()
        .filter_map(|c| Some((c.name.as_str(), c.values.as_numbers()?)))
        .collect();

    if numeric.is_empty() {
        return None;
    }

    let values = numeric
        .iter()
        .enumerate()
        .map(|(i, (_, x))| {
            numeric
                .iter()
                .enumerate()
                .map(|(j, (_, y))| {
                    if i == j {
                        self_correlation(x, policy)
                    } else {
                        pearson(x, y, policy)
                    }
                })
                .collect()
        })
        .collect();

    Some(CorrelationMatrix {
        columns: numeric.iter().map(|(name, _)| (*name).to_string()).collect(),
        values,
    })
}

/// Elementwise `b - a` over the columns present in both, in `a`'s order
pub fn diff_matrices(a: &CorrelationMatrix, b: &CorrelationMatrix) -> CorrelationMatrix {
    let columns: Vec<String> = a
        .columns
        .iter()
        .filter(|c| b.index_of(c).is_some())
        .cloned()
        .collect();

    let values = columns
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|col| Some(b.get(row, col)? - a.get(row, col)?))
                .collect()
        })
        .collect();

    CorrelationMatrix { columns, values }
}

/// True when every value equals the first
fn is_constant(values: impl IntoIterator<Item = f64>) -> bool {
    let mut iter = values.into_iter();
    match iter.next() {
        Some(first) => iter.all(|v| v == first),
        None => true,
    }
}

fn self_correlation(x: &[Option<f64>], policy: ZeroVariancePolicy) -> Option<f64> {
    let present: Vec<f64> = x.iter().filter_map(|v| *v).collect();
    if present.len() < 2 {
        return None;
    }
    if is_constant(present.iter().copied()) && policy == ZeroVariancePolicy::Undefined {
        return None;
    }
    Some(1.0)
}

fn pearson(x: &[Option<f64>], y: &[Option<f64>], policy: ZeroVariancePolicy) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    if is_constant(pairs.iter().map(|(a, _)| *a)) || is_constant(pairs.iter().map(|(_, b)| *b)) {
        return match policy {
            ZeroVariancePolicy::Undefined => None,
            ZeroVariancePolicy::Uncorrelated => Some(0.0),
        };
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}
