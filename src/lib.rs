//! Finsight - financial metrics for tabular data
//!
//! Loads CSV, Excel and YAML tables and derives financial ratios, first-vs-last growth
//! trends, Pearson correlation matrices, least-squares forecasts and multi-table
//! comparisons. The engine in [`core`] is pure: every operation borrows a [`Table`]
//! and returns an owned result.
//!
//! # Example
//!
//! ```no_run
//! use finsight::config::AnalysisConfig;
//! use finsight::core::{analyze, forecast};
//! use finsight::loader::load_table;
//! use std::path::Path;
//!
//! let config = AnalysisConfig::default();
//! let table = load_table(Path::new("quarterly.csv"), &config)?;
//!
//! let report = analyze(&table, &config);
//! for (ratio, value) in &report.ratios {
//!     println!("{ratio}: {value:.3}");
//! }
//!
//! let revenue = forecast(&table, "revenue", 4)?;
//! println!("next quarter: {:.0}", revenue.points[0].value);
//! # Ok::<(), finsight::error::FinsightError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod loader;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use config::AnalysisConfig;
pub use error::{FinsightError, FinsightResult};
pub use types::{Column, ColumnKind, ColumnValue, Table};
