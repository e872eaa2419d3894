use crate::models::{AccidentTable, ClimateVariable, Severity};
use crate::processors::RecordFilter;
use crate::utils::stats::{mean, quantile_sorted, sorted_finite};
use serde::Serialize;
use std::collections::BTreeMap;

/// Box-plot statistics for one severity level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityBoxStats {
    pub severity: Severity,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl SeverityBoxStats {
    pub fn interquartile_range(&self) -> f64 {
        self.q3 - self.q1
    }

    fn from_values(severity: Severity, values: Vec<f64>) -> Option<Self> {
        let sorted = sorted_finite(values);
        Some(Self {
            severity,
            count: sorted.len(),
            min: *sorted.first()?,
            q1: quantile_sorted(&sorted, 0.25)?,
            median: quantile_sorted(&sorted, 0.5)?,
            q3: quantile_sorted(&sorted, 0.75)?,
            max: *sorted.last()?,
            mean: mean(sorted.iter().copied())?,
        })
    }
}

/// Distribution of a climate reading per severity level, ascending by level.
/// Levels without readings are omitted.
pub fn climate_by_severity(
    table: &AccidentTable,
    filter: &RecordFilter,
    variable: ClimateVariable,
) -> Vec<SeverityBoxStats> {
    let mut groups: BTreeMap<Severity, Vec<f64>> = BTreeMap::new();
    for record in filter.apply(table) {
        if let Some(value) = record.climate(variable) {
            groups.entry(record.severity).or_default().push(value);
        }
    }

    groups
        .into_iter()
        .filter_map(|(severity, values)| SeverityBoxStats::from_values(severity, values))
        .collect()
}
