//! Multi-table comparison against a baseline (the first table)

use crate::core::correlation::{correlation_matrix, diff_matrices, CorrelationMatrix, ZeroVariancePolicy};
use crate::core::stats::SummaryStats;
use crate::error::{FinsightError, FinsightResult};
use crate::types::Table;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Correlation change of one table relative to the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationDelta {
    /// `dataset_{n}_vs_1`, `n` being the 1-based table position
    pub label: String,
    pub table: String,
    pub matrix: CorrelationMatrix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub table_names: Vec<String>,
    pub common_columns: Vec<String>,
    /// One entry per table, `None` where the column is not numeric or empty there
    pub summary_statistics: BTreeMap<String, Vec<Option<SummaryStats>>>,
    /// Percentage difference of each non-baseline mean against the baseline mean
    pub differences: BTreeMap<String, Vec<Option<f64>>>,
    pub correlation_deltas: Vec<CorrelationDelta>,
}

/// Compare two or more tables.
///
/// # Errors
/// `InvalidInput` when fewer than two tables are given.
pub fn compare(tables: &[Table], policy: ZeroVariancePolicy) -> FinsightResult<ComparisonResult> {
    let [baseline, others @ ..] = tables else {
        return Err(FinsightError::InvalidInput(
            "comparison needs at least two tables".to_string(),
        ));
    };
    if others.is_empty() {
        return Err(FinsightError::InvalidInput(
            "comparison needs at least two tables".to_string(),
        ));
    }

    let common_columns = common_columns(tables);
    let summary_statistics = summary_statistics(tables, &common_columns);
    let differences = mean_differences(&summary_statistics);
    let correlation_deltas = correlation_deltas(baseline, others, policy);

    info!(
        tables = tables.len(),
        common = common_columns.len(),
        deltas = correlation_deltas.len(),
        "comparison complete"
    );

    Ok(ComparisonResult {
        table_names: tables.iter().map(|t| t.name.clone()).collect(),
        common_columns,
        summary_statistics,
        differences,
        correlation_deltas,
    })
}

/// Exact-name columns shared by every table, in the first table's order
pub fn common_columns(tables: &[Table]) -> Vec<String> {
    let Some((first, rest)) = tables.split_first() else {
        return Vec::new();
    };

    let others: Vec<HashSet<&str>> = rest
        .iter()
        .map(|t| t.columns.iter().map(|c| c.name.as_str()).collect())
        .collect();

    first
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| others.iter().all(|set| set.contains(name)))
        .map(str::to_string)
        .collect()
}

/// Summary statistics per common column numeric in the baseline table
fn summary_statistics(
    tables: &[Table],
    common_columns: &[String],
) -> BTreeMap<String, Vec<Option<SummaryStats>>> {
    let mut results = BTreeMap::new();

    for name in common_columns {
        let numeric_in_baseline = tables[0].column(name).is_some_and(|c| c.is_numeric());
        if !numeric_in_baseline {
            continue;
        }

        let per_table: Vec<Option<SummaryStats>> = tables
            .iter()
            .map(|table| {
                let values = table.column(name)?.values.as_numbers();
                if values.is_none() {
                    debug!(table = %table.name, column = %name, "column is not numeric in this table");
                }
                SummaryStats::from_column(values?)
            })
            .collect();

        results.insert(name.clone(), per_table);
    }

    results
}

/// `(mean_i - mean_0) / mean_0 * 100`; a column with a zero or undefined baseline mean
/// is dropped entirely
fn mean_differences(
    stats: &BTreeMap<String, Vec<Option<SummaryStats>>>,
) -> BTreeMap<String, Vec<Option<f64>>> {
    let mut differences = BTreeMap::new();

    for (name, per_table) in stats {
        let Some((Some(baseline), rest)) = per_table.split_first() else {
            debug!(column = %name, "baseline mean undefined");
            continue;
        };
        let base = baseline.mean;
        if base == 0.0 {
            debug!(column = %name, "baseline mean is zero");
            continue;
        }

        let diffs = rest
            .iter()
            .map(|s| s.as_ref().map(|s| (s.mean - base) / base * 100.0))
            .collect();
        differences.insert(name.clone(), diffs);
    }

    differences
}

fn correlation_deltas(
    baseline: &Table,
    others: &[Table],
    policy: ZeroVariancePolicy,
) -> Vec<CorrelationDelta> {
    let Some(base_matrix) = correlation_matrix(baseline, policy) else {
        return Vec::new();
    };

    others
        .iter()
        .enumerate()
        .filter_map(|(i, table)| {
            let matrix = correlation_matrix(table, policy)?;
            let delta = diff_matrices(&base_matrix, &matrix);
            if delta.is_empty() {
                return None;
            }
            Some(CorrelationDelta {
                // Baseline is dataset 1, so others start at 2
                label: format!("dataset_{}_vs_1", i + 2),
                table: table.name.clone(),
                matrix: delta,
            })
        })
        .collect()
}
