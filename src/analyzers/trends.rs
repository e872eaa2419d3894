use crate::models::{AccidentTable, YearMonth};
use crate::processors::RecordFilter;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub year_month: YearMonth,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub months: usize,
    pub busiest: MonthlyCount,
    pub quietest: MonthlyCount,
    pub mean_per_month: f64,
}

/// Accidents per calendar month, oldest first. Rows without a start time
/// are not counted.
pub fn monthly_counts(table: &AccidentTable, filter: &RecordFilter) -> Vec<MonthlyCount> {
    let mut counts: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for year_month in filter.apply(table).filter_map(|r| r.year_month) {
        *counts.entry(year_month).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(year_month, count)| MonthlyCount { year_month, count })
        .collect()
}

/// Busiest and quietest month (earliest wins ties) and the monthly mean.
pub fn trend_summary(table: &AccidentTable, filter: &RecordFilter) -> Option<TrendSummary> {
    let series = monthly_counts(table, filter);
    let first = series.first()?;

    let mut busiest = first;
    let mut quietest = first;
    for month in &series[1..] {
        if month.count > busiest.count {
            busiest = month;
        }
        if month.count < quietest.count {
            quietest = month;
        }
    }

    let total: usize = series.iter().map(|m| m.count).sum();
    Some(TrendSummary {
        months: series.len(),
        busiest: busiest.clone(),
        quietest: quietest.clone(),
        mean_per_month: total as f64 / series.len() as f64,
    })
}
