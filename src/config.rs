//! Analysis configuration
//!
//! Loaded from an optional YAML file; every field falls back to its default.
//!
//! ```yaml
//! forecast_periods: 4
//! max_chart_columns: 5
//! zero_variance: uncorrelated
//! max_file_bytes: 16777216
//! ```

use crate::core::correlation::ZeroVariancePolicy;
use crate::core::forecast::DEFAULT_FORECAST_PERIODS;
use crate::error::{FinsightError, FinsightResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of numeric columns turned into chart series per analysis
pub const DEFAULT_MAX_CHART_COLUMNS: usize = 5;

/// Largest input file the loader accepts (16 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub forecast_periods: usize,
    pub max_chart_columns: usize,
    pub zero_variance: ZeroVariancePolicy,
    pub max_file_bytes: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            max_chart_columns: DEFAULT_MAX_CHART_COLUMNS,
            zero_variance: ZeroVariancePolicy::default(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> FinsightResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> FinsightResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> FinsightResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> FinsightResult<()> {
        if self.forecast_periods == 0 {
            return Err(FinsightError::Validation(
                "forecast_periods must be at least 1".to_string(),
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(FinsightError::Validation(
                "max_file_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
