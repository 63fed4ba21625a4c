//! Named financial ratios derived from heuristically matched columns

use crate::core::stats;
use crate::types::{Column, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKey {
    ProfitMargin,
    GrossMargin,
    Roa,
    Roe,
    CurrentRatio,
    DebtToEquity,
    EstimatedProfitMargin,
}

impl RatioKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatioKey::ProfitMargin => "profit_margin",
            RatioKey::GrossMargin => "gross_margin",
            RatioKey::Roa => "roa",
            RatioKey::Roe => "roe",
            RatioKey::CurrentRatio => "current_ratio",
            RatioKey::DebtToEquity => "debt_to_equity",
            RatioKey::EstimatedProfitMargin => "estimated_profit_margin",
        }
    }
}

impl std::fmt::Display for RatioKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Ratios = BTreeMap<RatioKey, f64>;

/// A ratio over logical (lowercase) column names
struct RatioRule {
    key: RatioKey,
    operands: &'static [&'static str],
    denominator: &'static str,
    numerator: fn(&[f64]) -> f64,
}

fn first(v: &[f64]) -> f64 {
    v[0]
}

fn difference(v: &[f64]) -> f64 {
    v[0] - v[1]
}

const RULES: &[RatioRule] = &[
    RatioRule {
        key: RatioKey::ProfitMargin,
        operands: &["net income"],
        denominator: "revenue",
        numerator: first,
    },
    RatioRule {
        key: RatioKey::GrossMargin,
        operands: &["revenue", "cost of goods sold"],
        denominator: "revenue",
        numerator: difference,
    },
    RatioRule {
        key: RatioKey::Roa,
        operands: &["net income"],
        denominator: "total assets",
        numerator: first,
    },
    RatioRule {
        key: RatioKey::Roe,
        operands: &["net income"],
        denominator: "equity",
        numerator: first,
    },
    RatioRule {
        key: RatioKey::CurrentRatio,
        operands: &["current assets"],
        denominator: "current liabilities",
        numerator: first,
    },
    RatioRule {
        key: RatioKey::DebtToEquity,
        operands: &["total debt"],
        denominator: "equity",
        numerator: first,
    },
];

/// Compute every ratio whose columns are available.
///
/// Rows with a missing operand or a zero denominator are left out of the mean;
/// a ratio with no usable row is omitted.
pub fn compute_ratios(table: &Table) -> Ratios {
    let mut ratios = Ratios::new();

    // Later columns win on a case-folded collision
    let lookup: HashMap<String, &Column> = table
        .columns
        .iter()
        .map(|c| (c.name.to_lowercase(), c))
        .collect();

    for rule in RULES {
        let resolve = |name: &str| {
            lookup
                .get(name)
                .and_then(|c| c.values.as_numbers())
        };

        let operands: Option<Vec<&[Option<f64>]>> =
            rule.operands.iter().map(|&name| resolve(name)).collect();
        let (Some(operands), Some(denominator)) = (operands, resolve(rule.denominator)) else {
            debug!(ratio = %rule.key, "required columns missing or not numeric");
            continue;
        };

        match mean_ratio(&operands, denominator, rule.numerator) {
            Some(value) => {
                ratios.insert(rule.key, value);
            }
            None => debug!(ratio = %rule.key, "no row with a non-zero denominator"),
        }
    }

    if let Some(value) = estimated_profit_margin(table) {
        ratios.insert(RatioKey::EstimatedProfitMargin, value);
    }

    ratios
}

/// Best-effort margin for non-standard column names: first "profit"/"margin" column
/// over first "revenue"/"income" column, both in declared order.
fn estimated_profit_margin(table: &Table) -> Option<f64> {
    let revenue = first_matching(table, &["revenue", "income"])?;
    let profit = first_matching(table, &["profit", "margin"])?;

    let (Some(num), Some(den)) = (profit.values.as_numbers(), revenue.values.as_numbers()) else {
        debug!(
            profit = %profit.name,
            revenue = %revenue.name,
            "estimated margin columns are not numeric"
        );
        return None;
    };

    mean_ratio(&[num], den, first)
}

fn first_matching<'a>(table: &'a Table, needles: &[&str]) -> Option<&'a Column> {
    table.columns.iter().find(|c| {
        let lower = c.name.to_lowercase();
        needles.iter().any(|n| lower.contains(n))
    })
}

fn mean_ratio(
    operands: &[&[Option<f64>]],
    denominator: &[Option<f64>],
    numerator: fn(&[f64]) -> f64,
) -> Option<f64> {
    let mut row_values = Vec::with_capacity(operands.len());
    let per_row: Vec<f64> = denominator
        .iter()
        .enumerate()
        .filter_map(|(row, den)| {
            let den = (*den)?;
            if den == 0.0 {
                return None;
            }
            row_values.clear();
            for operand in operands {
                row_values.push(operand.get(row).copied().flatten()?);
            }
            Some(numerator(&row_values) / den)
        })
        .collect();

    stats::mean(&per_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnValue;
    use approx::assert_relative_eq;

    #[test]
    fn test_gross_margin() {
        let table = Table::new("t")
            .with_column(Column::numeric("Revenue", [100.0, 200.0]))
            .with_column(Column::numeric("Cost of Goods Sold", [60.0, 100.0]));
        let ratios = compute_ratios(&table);
        assert_relative_eq!(ratios[&RatioKey::GrossMargin], 0.45, epsilon = 1e-12);
        assert!(!ratios.contains_key(&RatioKey::ProfitMargin));
    }

    #[test]
    fn test_zero_denominator_rows_excluded() {
        let table = Table::new("t")
            .with_column(Column::numeric("current assets", [10.0, 50.0, 30.0]))
            .with_column(Column::numeric("current liabilities", [5.0, 0.0, 10.0]));
        let ratios = compute_ratios(&table);
        assert_relative_eq!(ratios[&RatioKey::CurrentRatio], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_all_zero_denominator_omits_ratio() {
        let table = Table::new("t")
            .with_column(Column::numeric("total debt", [10.0, 20.0]))
            .with_column(Column::numeric("equity", [0.0, 0.0]));
        assert!(compute_ratios(&table).is_empty());
    }

    #[test]
    fn test_missing_operand_rows_excluded() {
        let table = Table::new("t")
            .with_column(Column::new(
                "net income",
                ColumnValue::Number(vec![Some(10.0), None]),
            ))
            .with_column(Column::numeric("equity", [100.0, 100.0]));
        let ratios = compute_ratios(&table);
        assert_relative_eq!(ratios[&RatioKey::Roe], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_text_column_skips_ratio() {
        let table = Table::new("t")
            .with_column(Column::text("revenue", ["a", "b"]))
            .with_column(Column::numeric("net income", [1.0, 2.0]));
        let ratios = compute_ratios(&table);
        assert!(!ratios.contains_key(&RatioKey::ProfitMargin));
    }

    #[test]
    fn test_estimated_margin_uses_first_candidates() {
        let table = Table::new("t")
            .with_column(Column::numeric("Gross Profit", [20.0, 30.0]))
            .with_column(Column::numeric("Total Revenue", [100.0, 100.0]))
            .with_column(Column::numeric("Other Income", [1.0, 1.0]))
            .with_column(Column::numeric("Operating Margin", [1.0, 1.0]));
        let ratios = compute_ratios(&table);
        assert_relative_eq!(
            ratios[&RatioKey::EstimatedProfitMargin],
            0.25,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_ratio_key_serializes_snake_case() {
        let json = serde_json::to_string(&RatioKey::DebtToEquity).unwrap();
        assert_eq!(json, "\"debt_to_equity\"");
        assert_eq!(RatioKey::Roa.to_string(), "roa");
    }
}
