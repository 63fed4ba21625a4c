//! Excel workbooks for reports (rust_xlsxwriter)

use crate::core::{AnalysisReport, ComparisonResult, CorrelationMatrix, ForecastSeries};
use crate::error::{FinsightError, FinsightResult};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

fn export_err(e: XlsxError) -> FinsightError {
    FinsightError::Export(e.to_string())
}

/// Worksheet column index, rejecting positions past the `u16` range
fn col_index(col: usize) -> FinsightResult<u16> {
    u16::try_from(col)
        .map_err(|_| FinsightError::Export(format!("Column index {} exceeds worksheet limits", col)))
}

fn write_headers(
    worksheet: &mut Worksheet,
    headers: &[&str],
    format: &Format,
) -> FinsightResult<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_index(col)?, *header, format)
            .map_err(export_err)?;
    }
    Ok(())
}

/// Undefined values are left as blank cells
fn write_optional(worksheet: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> FinsightResult<()> {
    if let Some(v) = value {
        worksheet.write_number(row, col, v).map_err(export_err)?;
    }
    Ok(())
}

fn write_matrix(
    worksheet: &mut Worksheet,
    matrix: &CorrelationMatrix,
    header_format: &Format,
) -> FinsightResult<()> {
    worksheet.set_column_width(0, 20).map_err(export_err)?;
    for (j, name) in matrix.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_index(j + 1)?, name, header_format)
            .map_err(export_err)?;
    }
    for (i, name) in matrix.columns.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet
            .write_string_with_format(row, 0, name, header_format)
            .map_err(export_err)?;
        for (j, value) in matrix.values[i].iter().enumerate() {
            write_optional(worksheet, row, col_index(j + 1)?, *value)?;
        }
    }
    Ok(())
}

pub(super) fn write_analysis(report: &AnalysisReport, output: &Path) -> FinsightResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let ratios = workbook.add_worksheet();
    ratios.set_name("Financial Ratios").map_err(export_err)?;
    ratios.set_column_width(0, 24).map_err(export_err)?;
    ratios.set_column_width(1, 12).map_err(export_err)?;
    write_headers(ratios, &["Ratio", "Value"], &header_format)?;
    for (i, (key, value)) in report.ratios.iter().enumerate() {
        let row = (i + 1) as u32;
        ratios.write_string(row, 0, key.as_str()).map_err(export_err)?;
        ratios.write_number(row, 1, *value).map_err(export_err)?;
    }

    let trends = workbook.add_worksheet();
    trends.set_name("Trends").map_err(export_err)?;
    trends.set_column_width(0, 24).map_err(export_err)?;
    trends.set_column_width(1, 16).map_err(export_err)?;
    trends.set_column_width(2, 12).map_err(export_err)?;
    write_headers(trends, &["Column", "Growth Rate (%)", "Direction"], &header_format)?;
    for (i, (column, entry)) in report.trends.iter().enumerate() {
        let row = (i + 1) as u32;
        trends.write_string(row, 0, column).map_err(export_err)?;
        trends.write_number(row, 1, entry.growth_rate).map_err(export_err)?;
        trends
            .write_string(row, 2, entry.direction.to_string())
            .map_err(export_err)?;
    }

    let correlation = workbook.add_worksheet();
    correlation.set_name("Correlation").map_err(export_err)?;
    if let Some(matrix) = &report.correlation {
        write_matrix(correlation, matrix, &header_format)?;
    }

    workbook.save(output).map_err(export_err)
}

pub(super) fn write_comparison(result: &ComparisonResult, output: &Path) -> FinsightResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let summary = workbook.add_worksheet();
    summary.set_name("Summary Statistics").map_err(export_err)?;
    summary.set_column_width(0, 24).map_err(export_err)?;
    summary.set_column_width(1, 20).map_err(export_err)?;
    write_headers(
        summary,
        &["Column", "Table", "Count", "Mean", "Median", "Std", "Min", "Max"],
        &header_format,
    )?;
    let mut row = 1u32;
    for (column, per_table) in &result.summary_statistics {
        for (table, stats) in result.table_names.iter().zip(per_table) {
            summary.write_string(row, 0, column).map_err(export_err)?;
            summary.write_string(row, 1, table).map_err(export_err)?;
            if let Some(stats) = stats {
                summary
                    .write_number(row, 2, stats.count as f64)
                    .map_err(export_err)?;
                summary.write_number(row, 3, stats.mean).map_err(export_err)?;
                summary.write_number(row, 4, stats.median).map_err(export_err)?;
                write_optional(summary, row, 5, stats.std)?;
                summary.write_number(row, 6, stats.min).map_err(export_err)?;
                summary.write_number(row, 7, stats.max).map_err(export_err)?;
            }
            row += 1;
        }
    }

    let differences = workbook.add_worksheet();
    differences.set_name("Differences").map_err(export_err)?;
    differences.set_column_width(0, 24).map_err(export_err)?;
    let mut headers = vec!["Column".to_string()];
    headers.extend(
        result
            .table_names
            .iter()
            .skip(1)
            .map(|name| format!("{} vs {} (%)", name, result.table_names[0])),
    );
    for (col, header) in headers.iter().enumerate() {
        differences
            .write_string_with_format(0, col_index(col)?, header, &header_format)
            .map_err(export_err)?;
    }
    for (i, (column, diffs)) in result.differences.iter().enumerate() {
        let row = (i + 1) as u32;
        differences.write_string(row, 0, column).map_err(export_err)?;
        for (j, diff) in diffs.iter().enumerate() {
            write_optional(differences, row, col_index(j + 1)?, *diff)?;
        }
    }

    for delta in &result.correlation_deltas {
        let sheet = workbook.add_worksheet();
        sheet.set_name(&delta.label).map_err(export_err)?;
        write_matrix(sheet, &delta.matrix, &header_format)?;
    }

    workbook.save(output).map_err(export_err)
}

pub(super) fn write_forecast(series: &ForecastSeries, output: &Path) -> FinsightResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Forecast").map_err(export_err)?;
    sheet.set_column_width(0, 10).map_err(export_err)?;
    sheet.set_column_width(1, 16).map_err(export_err)?;
    write_headers(sheet, &["Period", series.column.as_str()], &header_format)?;
    for (i, point) in series.points.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet
            .write_number(row, 0, point.period as f64)
            .map_err(export_err)?;
        sheet.write_number(row, 1, point.value).map_err(export_err)?;
    }

    let meta_row = (series.points.len() + 2) as u32;
    for (offset, (label, value)) in [("Slope", series.slope), ("Intercept", series.intercept)]
        .into_iter()
        .enumerate()
    {
        let row = meta_row + offset as u32;
        sheet
            .write_string_with_format(row, 0, label, &header_format)
            .map_err(export_err)?;
        sheet.write_number(row, 1, value).map_err(export_err)?;
    }

    workbook.save(output).map_err(export_err)
}
