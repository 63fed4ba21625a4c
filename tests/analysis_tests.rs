//! Single-table analysis tests: ratios, trends, correlation, forecast, series

use approx::assert_abs_diff_eq;
use finsight::config::AnalysisConfig;
use finsight::core::{
    analyze, compute_ratios, correlation_matrix, detect_trends, extract_series, forecast,
    Direction, RatioKey, ZeroVariancePolicy, DEFAULT_FORECAST_PERIODS,
};
use finsight::error::FinsightError;
use finsight::loader::load_table;
use finsight::types::{Column, ColumnValue, Table};
use pretty_assertions::assert_eq;
use std::path::Path;

fn quarterly() -> Table {
    load_table(Path::new("test-data/quarterly.csv"), &AnalysisConfig::default()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// RATIO TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_profit_margin_is_mean_of_row_ratios() {
    let table = Table::new("t")
        .with_column(Column::numeric("revenue", [100.0, 200.0, 400.0]))
        .with_column(Column::numeric("net income", [10.0, 30.0, 100.0]));

    let ratios = compute_ratios(&table);
    let expected = (0.1 + 0.15 + 0.25) / 3.0;
    assert_abs_diff_eq!(ratios[&RatioKey::ProfitMargin], expected, epsilon = 1e-12);
}

#[test]
fn test_profit_margin_independent_of_row_order() {
    let forward = Table::new("t")
        .with_column(Column::numeric("Revenue", [100.0, 250.0, 80.0, 40.0]))
        .with_column(Column::numeric("Net Income", [7.0, 50.0, 4.0, 10.0]));
    let shuffled = Table::new("t")
        .with_column(Column::numeric("Revenue", [40.0, 80.0, 100.0, 250.0]))
        .with_column(Column::numeric("Net Income", [10.0, 4.0, 7.0, 50.0]));

    assert_abs_diff_eq!(
        compute_ratios(&forward)[&RatioKey::ProfitMargin],
        compute_ratios(&shuffled)[&RatioKey::ProfitMargin],
        epsilon = 1e-12
    );
}

#[test]
fn test_all_standard_ratios_from_fixture() {
    let ratios = compute_ratios(&quarterly());

    assert_abs_diff_eq!(ratios[&RatioKey::ProfitMargin], 0.115, epsilon = 1e-9);
    assert_abs_diff_eq!(ratios[&RatioKey::CurrentRatio], 1.55, epsilon = 1e-9);
    assert_abs_diff_eq!(
        ratios[&RatioKey::GrossMargin],
        (0.4 + 460.0 / 1100.0 + 0.44 + 640.0 / 1400.0) / 4.0,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(
        ratios[&RatioKey::Roe],
        (0.05 + 121.0 / 2100.0 + 150.0 / 2250.0 + 182.0 / 2400.0) / 4.0,
        epsilon = 1e-9
    );
    assert!(ratios.contains_key(&RatioKey::Roa));
    assert!(ratios.contains_key(&RatioKey::DebtToEquity));
    // No column mentions profit or margin
    assert!(!ratios.contains_key(&RatioKey::EstimatedProfitMargin));
}

#[test]
fn test_zero_revenue_rows_skipped() {
    let table = Table::new("t")
        .with_column(Column::numeric("revenue", [0.0, 200.0]))
        .with_column(Column::numeric("net income", [5.0, 20.0]));

    assert_abs_diff_eq!(compute_ratios(&table)[&RatioKey::ProfitMargin], 0.1, epsilon = 1e-12);
}

#[test]
fn test_all_zero_denominator_omits_ratio() {
    let table = Table::new("t")
        .with_column(Column::numeric("revenue", [0.0, 0.0]))
        .with_column(Column::numeric("net income", [5.0, 20.0]));

    assert!(!compute_ratios(&table).contains_key(&RatioKey::ProfitMargin));
}

#[test]
fn test_text_column_blocks_ratio() {
    let table = Table::new("t")
        .with_column(Column::text("revenue", ["high", "low"]))
        .with_column(Column::numeric("net income", [5.0, 20.0]));

    assert!(!compute_ratios(&table).contains_key(&RatioKey::ProfitMargin));
}

#[test]
fn test_estimated_profit_margin_heuristic() {
    let table = Table::new("t")
        .with_column(Column::numeric("Gross Profit", [30.0, 60.0]))
        .with_column(Column::numeric("Total Revenue", [100.0, 200.0]));

    let ratios = compute_ratios(&table);
    assert_abs_diff_eq!(
        ratios[&RatioKey::EstimatedProfitMargin],
        0.3,
        epsilon = 1e-12
    );
    assert!(!ratios.contains_key(&RatioKey::ProfitMargin));
}

#[test]
fn test_ratios_on_empty_table() {
    assert!(compute_ratios(&Table::new("empty")).is_empty());

    let no_rows = Table::new("t")
        .with_column(Column::numeric("revenue", []))
        .with_column(Column::numeric("net income", []));
    assert!(compute_ratios(&no_rows).is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// TREND TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_trend_doubling() {
    let table = Table::new("t").with_column(Column::numeric("sales", [5.0, 10.0]));
    let trend = detect_trends(&table)["sales"];
    assert_abs_diff_eq!(trend.growth_rate, 100.0, epsilon = 1e-12);
    assert_eq!(trend.direction, Direction::Increasing);
}

#[test]
fn test_trend_flat_is_decreasing() {
    let table = Table::new("t").with_column(Column::numeric("sales", [5.0, 5.0]));
    let trend = detect_trends(&table)["sales"];
    assert_eq!(trend.growth_rate, 0.0);
    assert_eq!(trend.direction, Direction::Decreasing);
}

#[test]
fn test_trend_zero_base_omitted() {
    let table = Table::new("t").with_column(Column::numeric("sales", [0.0, 10.0]));
    assert!(detect_trends(&table).is_empty());
}

#[test]
fn test_trend_uses_only_endpoints() {
    let table = Table::new("t").with_column(Column::numeric("sales", [100.0, 1.0, 900.0, 50.0]));
    let trend = detect_trends(&table)["sales"];
    assert_abs_diff_eq!(trend.growth_rate, -50.0, epsilon = 1e-12);
    assert_eq!(trend.direction, Direction::Decreasing);
}

#[test]
fn test_trend_missing_endpoint_omitted() {
    let table = Table::new("t").with_column(Column::new(
        "sales",
        ColumnValue::Number(vec![Some(5.0), Some(7.0), None]),
    ));
    assert!(detect_trends(&table).is_empty());
}

#[test]
fn test_trends_on_empty_table() {
    assert!(detect_trends(&Table::new("empty")).is_empty());
    let no_rows = Table::new("t").with_column(Column::numeric("sales", []));
    assert!(detect_trends(&no_rows).is_empty());
}

#[test]
fn test_trends_from_fixture() {
    let trends = detect_trends(&quarterly());
    assert_abs_diff_eq!(trends["Revenue"].growth_rate, 40.0, epsilon = 1e-9);
    assert_abs_diff_eq!(trends["Net Income"].growth_rate, 82.0, epsilon = 1e-9);
    assert!(!trends.contains_key("Period"));
}

// ═══════════════════════════════════════════════════════════════════════════
// CORRELATION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_column_matrix_is_one() {
    let table = Table::new("t").with_column(Column::numeric("x", [1.0, 2.0, 3.0]));
    let matrix = correlation_matrix(&table, ZeroVariancePolicy::default()).unwrap();
    assert_eq!(matrix.columns, vec!["x"]);
    assert_eq!(matrix.values, vec![vec![Some(1.0)]]);
}

#[test]
fn test_no_numeric_columns_no_matrix() {
    let table = Table::new("t").with_column(Column::text("name", ["a", "b"]));
    assert!(correlation_matrix(&table, ZeroVariancePolicy::default()).is_none());
}

#[test]
fn test_matrix_symmetric_and_bounded() {
    let matrix = correlation_matrix(&quarterly(), ZeroVariancePolicy::default()).unwrap();
    assert_eq!(matrix.len(), 8);

    for i in 0..matrix.len() {
        assert_eq!(matrix.values[i][i], Some(1.0));
        for j in 0..matrix.len() {
            let v = matrix.values[i][j].unwrap();
            assert!((-1.0..=1.0).contains(&v));
            assert_abs_diff_eq!(v, matrix.values[j][i].unwrap(), epsilon = 1e-12);
        }
    }
    assert!(matrix.get("Revenue", "Net Income").unwrap() > 0.99);
}

#[test]
fn test_perfect_negative_correlation() {
    let table = Table::new("t")
        .with_column(Column::numeric("a", [1.0, 2.0, 3.0]))
        .with_column(Column::numeric("b", [30.0, 20.0, 10.0]));
    let matrix = correlation_matrix(&table, ZeroVariancePolicy::default()).unwrap();
    assert_abs_diff_eq!(matrix.get("a", "b").unwrap(), -1.0, epsilon = 1e-12);
}

#[test]
fn test_zero_variance_policies() {
    let table = Table::new("t")
        .with_column(Column::numeric("a", [1.0, 2.0, 3.0]))
        .with_column(Column::numeric("flat", [4.0, 4.0, 4.0]));

    let undefined = correlation_matrix(&table, ZeroVariancePolicy::Undefined).unwrap();
    assert_eq!(undefined.get("a", "flat"), None);
    assert_eq!(undefined.get("flat", "flat"), None);
    assert_eq!(undefined.get("a", "a"), Some(1.0));

    let uncorrelated = correlation_matrix(&table, ZeroVariancePolicy::Uncorrelated).unwrap();
    assert_eq!(uncorrelated.get("a", "flat"), Some(0.0));
    assert_eq!(uncorrelated.get("flat", "flat"), Some(1.0));
}

#[test]
fn test_pairwise_complete_rows() {
    let table = Table::new("t")
        .with_column(Column::new(
            "a",
            ColumnValue::Number(vec![Some(1.0), Some(2.0), None, Some(4.0)]),
        ))
        .with_column(Column::numeric("b", [2.0, 4.0, 100.0, 8.0]));
    let matrix = correlation_matrix(&table, ZeroVariancePolicy::default()).unwrap();
    assert_abs_diff_eq!(matrix.get("a", "b").unwrap(), 1.0, epsilon = 1e-12);
}

// ═══════════════════════════════════════════════════════════════════════════
// FORECAST TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_forecast_reproduces_perfect_line() {
    let table = Table::new("t").with_column(Column::numeric(
        "revenue",
        [1000.0, 1100.0, 1200.0, 1300.0, 1400.0],
    ));

    let series = forecast(&table, "revenue", 3).unwrap();
    let values = series.values();
    assert_eq!(values.len(), 3);
    assert_abs_diff_eq!(values[0], 1500.0, epsilon = 1e-9);
    assert_abs_diff_eq!(values[1] - values[0], 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(values[2] - values[1], 100.0, epsilon = 1e-9);
    assert!(values.iter().all(|v| *v >= 1400.0));
    assert_eq!(
        series.points.iter().map(|p| p.period).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_forecast_fixture_ols() {
    let series = forecast(&quarterly(), "Revenue", DEFAULT_FORECAST_PERIODS).unwrap();
    assert_abs_diff_eq!(series.slope, 135.0, epsilon = 1e-9);
    assert_abs_diff_eq!(series.intercept, 985.0, epsilon = 1e-9);
    assert_abs_diff_eq!(series.points[0].value, 1525.0, epsilon = 1e-9);
    assert_abs_diff_eq!(series.points[2].value, 1795.0, epsilon = 1e-9);
}

#[test]
fn test_forecast_single_value_is_flat() {
    let table = Table::new("t").with_column(Column::numeric("revenue", [42.0]));
    let series = forecast(&table, "revenue", 2).unwrap();
    assert_eq!(series.values(), vec![42.0, 42.0]);
}

#[test]
fn test_forecast_errors() {
    let table = Table::new("t")
        .with_column(Column::numeric("revenue", [1.0, 2.0]))
        .with_column(Column::text("quarter", ["Q1", "Q2"]))
        .with_column(Column::new("empty", ColumnValue::Number(vec![None, None])));

    assert!(matches!(
        forecast(&table, "ebitda", 3),
        Err(FinsightError::UnknownColumn(_))
    ));
    assert!(matches!(
        forecast(&table, "quarter", 3),
        Err(FinsightError::NotNumeric(_))
    ));
    assert!(matches!(
        forecast(&table, "revenue", 0),
        Err(FinsightError::InvalidInput(_))
    ));
    assert!(matches!(
        forecast(&table, "empty", 3),
        Err(FinsightError::InsufficientData(_))
    ));
}

#[test]
fn test_forecast_skips_missing_rows() {
    let table = load_table(Path::new("test-data/sparse.csv"), &AnalysisConfig::default()).unwrap();
    let series = forecast(&table, "revenue", 1).unwrap();
    assert_abs_diff_eq!(series.slope, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(series.points[0].value, 180.0, epsilon = 1e-9);
}

// ═══════════════════════════════════════════════════════════════════════════
// FULL ANALYSIS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_analyze_fixture() {
    let report = analyze(&quarterly(), &AnalysisConfig::default());

    assert_eq!(report.table, "quarterly");
    assert_eq!(report.row_count, 4);
    assert_eq!(report.columns.len(), 9);
    assert_eq!(report.numeric_columns.len(), 8);
    assert_eq!(report.series.len(), 5);
    assert_eq!(report.series[0].labels[0], "2024-Q1");
    assert!(report.correlation.is_some());
    assert_eq!(report.ratios.len(), 6);
}

#[test]
fn test_series_default_labels_and_gaps() {
    let table = load_table(Path::new("test-data/sparse.csv"), &AnalysisConfig::default()).unwrap();
    let series = extract_series(&table, "revenue").unwrap();
    assert_eq!(series.labels[0], "2024-01-31");
    assert_eq!(series.values, vec![Some(100.0), None, None, Some(160.0)]);
}
