//! FILENAME: grid-engine/src/summary.rs
//! Total summaries and per-group counts.

use grid_model::{format_general, Row};
use serde::Serialize;

use crate::definition::{GridConfig, SummaryItem, SummaryType};

/// Accumulates values for one summary column.
#[derive(Debug, Clone, Default)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
    pub count_numbers: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a numeric value to the accumulator.
    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.count_numbers += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Adds a non-numeric value (only increments count).
    pub fn add_non_number(&mut self) {
        self.count += 1;
    }

    /// Computes the final aggregate value.
    pub fn compute(&self, summary_type: SummaryType) -> f64 {
        match summary_type {
            SummaryType::Sum => self.sum,
            SummaryType::Count => self.count as f64,
            SummaryType::Avg => {
                if self.count_numbers > 0 {
                    self.sum / (self.count_numbers as f64)
                } else {
                    0.0
                }
            }
            SummaryType::Min => self.min.unwrap_or(0.0),
            SummaryType::Max => self.max.unwrap_or(0.0),
        }
    }
}

/// One rendered total summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryValue {
    pub column_name: String,
    pub summary_type: SummaryType,
    pub label: String,
    pub value: f64,
    pub text: String,
}

/// Compute total summaries over `rows`.
///
/// `customSummaries`, when given, replaces the built-in aggregation
/// entirely: item `i` takes custom value `i` (missing values become 0).
pub fn compute_totals<'a>(config: &GridConfig, rows: impl IntoIterator<Item = &'a Row>) -> Vec<SummaryValue> {
    let items = &config.summary_items;

    let values: Vec<f64> = match &config.custom_summaries {
        Some(custom) => (0..items.len())
            .map(|i| custom.get(i).copied().unwrap_or(0.0))
            .collect(),
        None => {
            let mut accumulators = vec![AggregateAccumulator::new(); items.len()];
            for row in rows {
                for (item, acc) in items.iter().zip(accumulators.iter_mut()) {
                    match row.get(&item.column_name).as_number() {
                        Some(n) => acc.add_number(n),
                        None => acc.add_non_number(),
                    }
                }
            }
            items
                .iter()
                .zip(&accumulators)
                .map(|(item, acc)| acc.compute(item.summary_type))
                .collect()
        }
    };

    items
        .iter()
        .zip(values)
        .map(|(item, value)| summary_value(config, item, value))
        .collect()
}

fn summary_value(config: &GridConfig, item: &SummaryItem, value: f64) -> SummaryValue {
    let label = config.summary_label(item.summary_type);
    SummaryValue {
        column_name: item.column_name.clone(),
        summary_type: item.summary_type,
        text: format!("{}: {}", label, format_general(value)),
        label,
        value,
    }
}
