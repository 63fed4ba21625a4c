//! One-shot financial metrics analysis of a single table

use crate::config::AnalysisConfig;
use crate::core::correlation::{correlation_matrix, CorrelationMatrix};
use crate::core::ratios::{compute_ratios, Ratios};
use crate::core::series::{extract_series, ColumnSeries};
use crate::core::trends::{detect_trends, Trends};
use crate::types::{ColumnKind, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub table: String,
    pub generated_at: DateTime<Utc>,
    pub row_count: usize,
    pub columns: Vec<ColumnInfo>,
    pub numeric_columns: Vec<String>,
    pub ratios: Ratios,
    pub trends: Trends,
    pub correlation: Option<CorrelationMatrix>,
    pub series: Vec<ColumnSeries>,
}

/// Run ratios, trends, correlation and series extraction over one table
pub fn analyze(table: &Table, config: &AnalysisConfig) -> AnalysisReport {
    let numeric_columns: Vec<String> = table.numeric_columns().map(|c| c.name.clone()).collect();

    let series = numeric_columns
        .iter()
        .take(config.max_chart_columns)
        .filter_map(|name| extract_series(table, name))
        .collect();

    let report = AnalysisReport {
        table: table.name.clone(),
        generated_at: Utc::now(),
        row_count: table.row_count(),
        columns: table
            .columns
            .iter()
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                kind: c.kind(),
            })
            .collect(),
        numeric_columns,
        ratios: compute_ratios(table),
        trends: detect_trends(table),
        correlation: correlation_matrix(table, config.zero_variance),
        series,
    };

    info!(
        table = %report.table,
        rows = report.row_count,
        ratios = report.ratios.len(),
        trends = report.trends.len(),
        "analysis complete"
    );

    report
}
