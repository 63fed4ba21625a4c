//! Report export: analysis, comparison and forecast results to JSON, YAML or Excel

mod xlsx;

use crate::core::{AnalysisReport, ComparisonResult, ForecastSeries};
use crate::error::{FinsightError, FinsightResult};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Output formats, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Yaml,
    Xlsx,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> FinsightResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            "xlsx" => Ok(ReportFormat::Xlsx),
            _ => Err(FinsightError::UnsupportedFormat(format!(
                "Unsupported output format: '{}'. Use .json, .yaml or .xlsx",
                ext
            ))),
        }
    }
}

/// Write a single-table analysis report
pub fn write_report(report: &AnalysisReport, path: &Path) -> FinsightResult<()> {
    match ReportFormat::from_path(path)? {
        ReportFormat::Xlsx => xlsx::write_analysis(report, path)?,
        format => write_serialized(report, path, format)?,
    }
    info!(path = %path.display(), table = %report.table, "analysis report written");
    Ok(())
}

/// Write a multi-table comparison report
pub fn write_comparison(result: &ComparisonResult, path: &Path) -> FinsightResult<()> {
    match ReportFormat::from_path(path)? {
        ReportFormat::Xlsx => xlsx::write_comparison(result, path)?,
        format => write_serialized(result, path, format)?,
    }
    info!(path = %path.display(), tables = result.table_names.len(), "comparison report written");
    Ok(())
}

/// Write forecast points for one column
pub fn write_forecast(series: &ForecastSeries, path: &Path) -> FinsightResult<()> {
    match ReportFormat::from_path(path)? {
        ReportFormat::Xlsx => xlsx::write_forecast(series, path)?,
        format => write_serialized(series, path, format)?,
    }
    info!(path = %path.display(), column = %series.column, "forecast written");
    Ok(())
}

fn write_serialized<T: Serialize>(value: &T, path: &Path, format: ReportFormat) -> FinsightResult<()> {
    let content = match format {
        ReportFormat::Json => serde_json::to_string_pretty(value)?,
        ReportFormat::Yaml => serde_yaml::to_string(value)?,
        ReportFormat::Xlsx => {
            return Err(FinsightError::Export(
                "xlsx output is not a text format".to_string(),
            ))
        }
    };
    fs::write(path, content)
        .map_err(|e| FinsightError::Export(format!("Failed to write {}: {}", path.display(), e)))
}
