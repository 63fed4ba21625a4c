//! Analysis engine: pure functions over borrowed tables

pub mod analyzer;
pub mod comparison;
pub mod correlation;
pub mod forecast;
pub mod ratios;
pub mod series;
pub mod stats;
pub mod trends;

pub use analyzer::{analyze, AnalysisReport};
pub use comparison::{compare, ComparisonResult, CorrelationDelta};
pub use correlation::{correlation_matrix, diff_matrices, CorrelationMatrix, ZeroVariancePolicy};
pub use forecast::{forecast, ForecastPoint, ForecastSeries, DEFAULT_FORECAST_PERIODS};
pub use ratios::{compute_ratios, RatioKey, Ratios};
pub use series::{extract_series, ColumnSeries};
pub use stats::SummaryStats;
pub use trends::{detect_trends, Direction, TrendEntry, Trends};
