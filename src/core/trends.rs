//! First-vs-last growth trends per numeric column

use crate::types::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increasing,
    Decreasing,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Increasing => f.write_str("increasing"),
            Direction::Decreasing => f.write_str("decreasing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    /// Percentage change from the first row to the last row
    pub growth_rate: f64,
    pub direction: Direction,
}

impl TrendEntry {
    /// Growth from `first` to `last`; `None` under a zero base
    pub fn between(first: f64, last: f64) -> Option<Self> {
        if first == 0.0 {
            return None;
        }
        let growth_rate = (last - first) / first * 100.0;
        // Zero growth counts as decreasing
        let direction = if growth_rate > 0.0 {
            Direction::Increasing
        } else {
            Direction::Decreasing
        };
        Some(Self {
            growth_rate,
            direction,
        })
    }
}

pub type Trends = BTreeMap<String, TrendEntry>;

/// Growth trend of every numeric column with at least two rows.
///
/// Columns with a missing or zero first value, or a missing last value, are omitted.
pub fn detect_trends(table: &Table) -> Trends {
    let mut trends = Trends::new();

    for column in table.numeric_columns() {
        let Some(values) = column.values.as_numbers() else {
            continue;
        };
        if values.len() < 2 {
            continue;
        }

        let (Some(first), Some(last)) = (values[0], values[values.len() - 1]) else {
            debug!(column = %column.name, "first or last value missing");
            continue;
        };

        match TrendEntry::between(first, last) {
            Some(entry) => {
                trends.insert(column.name.clone(), entry);
            }
            None => debug!(column = %column.name, "zero base value, growth undefined"),
        }
    }

    trends
}
